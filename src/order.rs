//! Ordering policies for sibling entries
//!
//! Every sorted policy is a total order over entries: ties on the primary
//! key fall back to a name comparison, so a stable sort always produces the
//! same sequence for the same input. `Ordering::Native` is not a comparator
//! at all; entries keep the order the directory read produced.

use std::cmp;

use crate::entry::{Entry, Stat, Timestamp};

/// Which timestamp time-based ordering and long output use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeField {
    #[default]
    Modified,
    Accessed,
    Changed,
}

impl TimeField {
    pub fn of(&self, stat: &Stat) -> Timestamp {
        match self {
            TimeField::Modified => stat.mtime,
            TimeField::Accessed => stat.atime,
            TimeField::Changed => stat.ctime,
        }
    }
}

/// Primary key of a sorted ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Byte-wise name, ascending.
    Name,
    /// Largest first; ties by name ascending.
    Size,
    /// Newest first; ties by name descending.
    Time(TimeField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// Directory read order, no sorting.
    Native,
    Sorted { key: SortKey, reverse: bool },
}

impl Default for Ordering {
    fn default() -> Self {
        Self::name_asc()
    }
}

impl Ordering {
    pub fn name_asc() -> Self {
        Ordering::Sorted {
            key: SortKey::Name,
            reverse: false,
        }
    }

    pub fn name_desc() -> Self {
        Self::name_asc().reversed()
    }

    pub fn size_desc() -> Self {
        Ordering::Sorted {
            key: SortKey::Size,
            reverse: false,
        }
    }

    pub fn time_desc(field: TimeField) -> Self {
        Ordering::Sorted {
            key: SortKey::Time(field),
            reverse: false,
        }
    }

    /// The exact reverse of this ordering. Native order stays native.
    pub fn reversed(self) -> Self {
        match self {
            Ordering::Native => Ordering::Native,
            Ordering::Sorted { key, reverse } => Ordering::Sorted {
                key,
                reverse: !reverse,
            },
        }
    }

    /// Compare two entries, or `None` when no comparator is active.
    pub fn compare(&self, a: &Entry, b: &Entry) -> Option<cmp::Ordering> {
        match self {
            Ordering::Native => None,
            Ordering::Sorted { key, reverse } => {
                let ord = compare_by_key(*key, a, b);
                Some(if *reverse { ord.reverse() } else { ord })
            }
        }
    }

    /// Stable in-place sort; a no-op for `Native`.
    pub fn sort(&self, entries: &mut [Entry]) {
        if let Ordering::Native = self {
            return;
        }
        entries.sort_by(|a, b| self.compare(a, b).unwrap_or(cmp::Ordering::Equal));
    }
}

fn compare_by_key(key: SortKey, a: &Entry, b: &Entry) -> cmp::Ordering {
    match key {
        SortKey::Name => by_name(a, b),
        SortKey::Size => b.size().cmp(&a.size()).then_with(|| by_name(a, b)),
        SortKey::Time(field) => {
            let ta = a.stat.map(|s| field.of(&s)).unwrap_or_default();
            let tb = b.stat.map(|s| field.of(&s)).unwrap_or_default();
            tb.cmp(&ta).then_with(|| by_name(b, a))
        }
    }
}

fn by_name(a: &Entry, b: &Entry) -> cmp::Ordering {
    a.name_bytes().cmp(b.name_bytes())
}
