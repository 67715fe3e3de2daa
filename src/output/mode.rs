//! Mode strings and type indicators

use crate::entry::{FileKind, Stat};

const S_ISUID: u32 = 0o4000;
const S_ISGID: u32 = 0o2000;
const S_ISVTX: u32 = 0o1000;

/// Format a mode as a 10-character string: a type letter followed by
/// three `rwx` triplets, e.g. `drwxr-xr-x`. Set-id and sticky bits show
/// in the execute slots as `s`/`S` and `t`/`T`.
pub fn mode_string(mode: u32) -> String {
    let mut s = String::with_capacity(10);
    s.push(type_letter(FileKind::from_mode(mode)));

    for (shift, special, set, unset) in [
        (6, S_ISUID, 's', 'S'),
        (3, S_ISGID, 's', 'S'),
        (0, S_ISVTX, 't', 'T'),
    ] {
        let bits = (mode >> shift) & 7;
        s.push(if bits & 4 != 0 { 'r' } else { '-' });
        s.push(if bits & 2 != 0 { 'w' } else { '-' });
        let exec = bits & 1 != 0;
        s.push(match (mode & special != 0, exec) {
            (true, true) => set,
            (true, false) => unset,
            (false, true) => 'x',
            (false, false) => '-',
        });
    }
    s
}

fn type_letter(kind: FileKind) -> char {
    match kind {
        FileKind::Regular => '-',
        FileKind::Directory => 'd',
        FileKind::Symlink => 'l',
        FileKind::CharDevice => 'c',
        FileKind::BlockDevice => 'b',
        FileKind::Fifo => 'p',
        FileKind::Socket => 's',
        FileKind::Whiteout => 'w',
        FileKind::Unknown => '?',
    }
}

/// The `-F` suffix for an entry, if any.
pub fn indicator(stat: &Stat) -> Option<char> {
    match stat.kind() {
        FileKind::Directory => Some('/'),
        FileKind::Symlink => Some('@'),
        FileKind::Socket => Some('='),
        FileKind::Fifo => Some('|'),
        FileKind::Whiteout => Some('%'),
        FileKind::Regular if stat.is_executable() => Some('*'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_modes() {
        assert_eq!(mode_string(0o100644), "-rw-r--r--");
        assert_eq!(mode_string(0o040755), "drwxr-xr-x");
        assert_eq!(mode_string(0o120777), "lrwxrwxrwx");
        assert_eq!(mode_string(0o020620), "crw--w----");
        assert_eq!(mode_string(0o060660), "brw-rw----");
        assert_eq!(mode_string(0o010600), "prw-------");
        assert_eq!(mode_string(0o140755), "srwxr-xr-x");
    }

    #[test]
    fn test_special_bits() {
        assert_eq!(mode_string(0o104755), "-rwsr-xr-x");
        assert_eq!(mode_string(0o104644), "-rwSr--r--");
        assert_eq!(mode_string(0o102755), "-rwxr-sr-x");
        assert_eq!(mode_string(0o041777), "drwxrwxrwt");
        assert_eq!(mode_string(0o041776), "drwxrwxrwT");
    }

    #[test]
    fn test_always_ten_chars() {
        for mode in [0o100000, 0o177777, 0o040000, 0o000000] {
            assert_eq!(mode_string(mode).chars().count(), 10);
        }
    }

    #[test]
    fn test_indicators() {
        let with_mode = |mode| Stat {
            mode,
            ..Default::default()
        };
        assert_eq!(indicator(&with_mode(0o040755)), Some('/'));
        assert_eq!(indicator(&with_mode(0o120777)), Some('@'));
        assert_eq!(indicator(&with_mode(0o140755)), Some('='));
        assert_eq!(indicator(&with_mode(0o010644)), Some('|'));
        assert_eq!(indicator(&with_mode(0o160000)), Some('%'));
        assert_eq!(indicator(&with_mode(0o100755)), Some('*'));
        assert_eq!(indicator(&with_mode(0o100010)), Some('*'));
        assert_eq!(indicator(&with_mode(0o100644)), None);
        assert_eq!(indicator(&with_mode(0o020666)), None);
    }
}
