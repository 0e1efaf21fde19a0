//! # Demo Library
//!
//! A tiny in-memory content engine so the main screen has something real to
//! drive: a handful of documents, each a list of entries (chapters,
//! dictionary articles, book sections).
//!
//! ```text
//! Library
//! └── Volume (Document + entries)
//!     └── Entry { key, verses, notes }
//! ```
//!
//! Loading goes through [`source::PassageSource`] on a background task and
//! reports back through the screen's `ChangeNotifier`, the same path a real
//! engine would use.

pub mod engine;
pub mod source;

pub use engine::ReaderEngine;
pub use source::{LibrarySource, PassageSource};

use crate::core::collaborators::Note;
use crate::core::page::{Document, PageKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    pub key: String,
    /// Verses for Bible/commentary entries, paragraphs otherwise.
    pub verses: Vec<String>,
    pub notes: Vec<Note>,
}

impl Entry {
    fn new(key: &str, verses: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            verses: verses.iter().map(|v| v.to_string()).collect(),
            notes: Vec::new(),
        }
    }

    fn with_note(mut self, key: &str, text: &str) -> Self {
        self.notes.push(Note {
            key: key.to_string(),
            text: text.to_string(),
        });
        self
    }
}

#[derive(Debug, Clone)]
pub struct Volume {
    pub document: Document,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Default)]
pub struct Library {
    volumes: Vec<Volume>,
}

impl Library {
    pub fn new(volumes: Vec<Volume>) -> Self {
        Self { volumes }
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    pub fn documents(&self) -> Vec<Document> {
        self.volumes.iter().map(|v| v.document.clone()).collect()
    }

    pub fn index_of(&self, document_id: &str) -> Option<usize> {
        self.volumes
            .iter()
            .position(|v| v.document.id.eq_ignore_ascii_case(document_id))
    }

    pub fn volume(&self, index: usize) -> Option<&Volume> {
        self.volumes.get(index)
    }

    /// The sample texts shipped with the binary.
    pub fn builtin() -> Self {
        let kjv = Volume {
            document: Document::new("KJV", "King James Version", PageKind::Bible),
            entries: vec![
                Entry::new(
                    "Genesis 1",
                    &[
                        "In the beginning God created the heaven and the earth.",
                        "And the earth was without form, and void; and darkness was upon the face of the deep. And the Spirit of God moved upon the face of the waters.",
                        "And God said, Let there be light: and there was light.",
                        "And God saw the light, that it was good: and God divided the light from the darkness.",
                        "And God called the light Day, and the darkness he called Night. And the evening and the morning were the first day.",
                    ],
                )
                .with_note("Genesis 1:2", "moved: or, was brooding"),
                Entry::new(
                    "Psalm 23",
                    &[
                        "The LORD is my shepherd; I shall not want.",
                        "He maketh me to lie down in green pastures: he leadeth me beside the still waters.",
                        "He restoreth my soul: he leadeth me in the paths of righteousness for his name's sake.",
                        "Yea, though I walk through the valley of the shadow of death, I will fear no evil: for thou art with me; thy rod and thy staff they comfort me.",
                        "Thou preparest a table before me in the presence of mine enemies: thou anointest my head with oil; my cup runneth over.",
                        "Surely goodness and mercy shall follow me all the days of my life: and I will dwell in the house of the LORD for ever.",
                    ],
                )
                .with_note("Psalm 23:2", "green pastures: Heb. pastures of tender grass")
                .with_note("Psalm 23:2", "still waters: Heb. waters of quietness"),
                Entry::new(
                    "John 1",
                    &[
                        "In the beginning was the Word, and the Word was with God, and the Word was God.",
                        "The same was in the beginning with God.",
                        "All things were made by him; and without him was not any thing made that was made.",
                        "In him was life; and the life was the light of men.",
                        "And the light shineth in darkness; and the darkness comprehended it not.",
                    ],
                ),
            ],
        };

        let mhc = Volume {
            document: Document::new("MHC", "Matthew Henry Concise", PageKind::Commentary),
            entries: vec![
                Entry::new(
                    "Genesis 1",
                    &[
                        "The first verse of the Bible gives us a satisfying and useful account of the origin of the earth and the heavens.",
                        "The faith of humble Christians understands this better than the fancy of the most learned men.",
                    ],
                ),
                Entry::new(
                    "John 1",
                    &[
                        "The plainest reason why the Son of God is called the Word, seems to be, that as our words explain our minds to others, so was the Son of God sent to reveal his Father's mind to the world.",
                    ],
                ),
            ],
        };

        let eastons = Volume {
            document: Document::new("Eastons", "Easton's Bible Dictionary", PageKind::Dictionary),
            entries: vec![
                Entry::new(
                    "Grace",
                    &[
                        "Grace: of form or person, favour, kindness, friendship; God's forgiving mercy.",
                    ],
                ),
                Entry::new(
                    "Logos",
                    &[
                        "Logos: a Greek term meaning word, applied to the Lord Jesus as the revealer of God.",
                    ],
                ),
            ],
        };

        let pilgrim = Volume {
            document: Document::new("Pilgrim", "The Pilgrim's Progress", PageKind::GeneralBook),
            entries: vec![
                Entry::new(
                    "The First Stage",
                    &[
                        "As I walked through the wilderness of this world, I lighted on a certain place where was a den, and I laid me down in that place to sleep.",
                        "And as I slept, I dreamed a dream.",
                    ],
                ),
                Entry::new(
                    "The Second Stage",
                    &["Now I saw in my dream, that the highway up which Christian was to go, was fenced on either side with a wall."],
                ),
            ],
        };

        Self::new(vec![kjv, mhc, eastons, pilgrim])
    }
}
