use cgisf_lib::cgisf;
use include_dir::{include_dir, Dir};
use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{Error, Result};

static PACK_DIR: Dir = include_dir!("src/sentences");

/// Built-in sentence packs
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, clap::ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SentencePack {
    #[default]
    Classic,
    Pangrams,
}

impl SentencePack {
    /// Parse a pack name as stored in the config file, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as clap::ValueEnum>::from_str(name, true).ok()
    }

    pub fn load(&self) -> Result<Pack> {
        let file_name = format!("{self}.json");
        let file = PACK_DIR
            .get_file(&file_name)
            .ok_or_else(|| Error::Sentences(format!("pack file {file_name} not found")))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| Error::Sentences(format!("pack file {file_name} is not utf-8")))?;

        Ok(serde_json::from_str(contents)?)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct Pack {
    pub name: String,
    pub sentences: Vec<String>,
}

/// Control characters (tabs, embedded newlines) cannot be typed, since Tab
/// resets and Enter is ignored; they become plain spaces.
fn typeable(sentence: &str) -> String {
    sentence
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Where target sentences come from
#[derive(Debug, Clone, PartialEq)]
pub enum SentenceSource {
    /// Uniform pick, with repetition, from a fixed list
    List(Vec<String>),
    /// A fresh sentence from the grammar generator on every pick
    Generated,
}

impl SentenceSource {
    pub fn from_pack(pack: SentencePack) -> Result<Self> {
        Self::from_sentences(pack.load()?.sentences)
            .map_err(|_| Error::Sentences(format!("pack {pack} has no sentences")))
    }

    pub fn from_prompt(prompt: &str) -> Result<Self> {
        let prompt = prompt.trim_end_matches(|c: char| c == '\r' || c == '\n');
        if prompt.is_empty() {
            return Err(Error::EmptyPrompt);
        }
        Ok(Self::List(vec![typeable(prompt)]))
    }

    /// One sentence per line; blank lines are skipped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let sentences = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        Self::from_sentences(sentences)
            .map_err(|_| Error::Sentences(format!("{} has no sentences", path.display())))
    }

    fn from_sentences(sentences: Vec<String>) -> Result<Self> {
        let sentences: Vec<String> = sentences
            .iter()
            .map(|s| typeable(s))
            .filter(|s| !s.is_empty())
            .collect();
        if sentences.is_empty() {
            return Err(Error::Sentences("no sentences".into()));
        }
        Ok(Self::List(sentences))
    }

    pub fn next_sentence(&self) -> String {
        let rng = &mut rand::thread_rng();
        match self {
            SentenceSource::List(sentences) => sentences
                .choose(rng)
                .cloned()
                .unwrap_or_default(),
            SentenceSource::Generated => {
                let sentence = cgisf(
                    rng.gen_range(1..3),
                    rng.gen_range(1..3),
                    rng.gen_range(1..5),
                    rng.gen_bool(0.5),
                    rng.gen_range(1..3),
                    rng.gen_bool(0.5),
                );
                sentence.trim().to_string()
            }
        }
    }
}
