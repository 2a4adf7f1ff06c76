//! Synonym table and default cover corpus for the linguistic codec.
//!
//! Twenty concept groups, exactly four synonyms each. The canonical order is
//! load-bearing: a word's index within its group IS its 2-bit value
//! (00/01/10/11), so reordering a group silently re-keys every stego text
//! ever produced.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Synonyms per concept group - fixed by the 2-bit encoding
pub(crate) const GROUP_SIZE: usize = 4;

/// The concept groups, canonical order fixed
pub(crate) const SYNONYM_GROUPS: [[&str; GROUP_SIZE]; 20] = [
    ["good", "great", "excellent", "fine"],
    ["bad", "poor", "terrible", "awful"],
    ["big", "large", "huge", "giant"],
    ["small", "tiny", "little", "mini"],
    ["fast", "quick", "rapid", "swift"],
    ["easy", "simple", "basic", "plain"],
    ["hard", "difficult", "tough", "complex"],
    ["new", "recent", "fresh", "modern"],
    ["old", "ancient", "aged", "dated"],
    ["start", "begin", "launch", "initiate"],
    ["end", "finish", "complete", "conclude"],
    ["make", "create", "build", "produce"],
    ["find", "discover", "locate", "detect"],
    ["think", "ponder", "consider", "reflect"],
    ["know", "understand", "grasp", "comprehend"],
    ["want", "desire", "wish", "need"],
    ["help", "assist", "aid", "support"],
    ["work", "function", "operate", "perform"],
    ["use", "employ", "utilize", "apply"],
    ["give", "provide", "offer", "supply"],
];

/// Reverse index: lowercase word → (group index, synonym index)
static WORD_INDEX: Lazy<HashMap<&'static str, (usize, usize)>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for (group_idx, group) in SYNONYM_GROUPS.iter().enumerate() {
        for (syn_idx, word) in group.iter().enumerate() {
            index.insert(*word, (group_idx, syn_idx));
        }
    }
    index
});

/// Look up a cleaned, lowercased word in the table
pub(crate) fn lookup(word: &str) -> Option<(usize, usize)> {
    WORD_INDEX.get(word).copied()
}

/// The synonym at a given group/index
pub(crate) fn synonym(group: usize, index: usize) -> &'static str {
    SYNONYM_GROUPS[group][index]
}

/// Default cover text, hand-written to be dense in group members so a single
/// copy already carries a useful number of 2-bit slots
pub(crate) const DEFAULT_COVER_TEXT: &str = "\
Good new methods make work easy and fast for all people to use every day. \
Big ideas help us find better ways to think about hard problems we face. \
Small teams can start to build great tools that give users what they want. \
It is important to know the old rules before you begin any difficult task. \
We should help each other and make things simple when work becomes complex. \
Modern systems need to function well and operate without any major issues. \
When you discover new concepts you must understand them before moving ahead. \
Smart developers create software to provide solutions and offer real value. \
The end goal is to produce results that users desire and truly appreciate.";
