
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;

/// Raw key code as reported by the global keyboard hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub fn name(self) -> Option<&'static str> {
        key_name(self.0)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("?"))
    }
}

/// A set of keys pressed together.
///
/// Keys keep the order they were added in (for display), but two combinations
/// are equal whenever they contain the same keys.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct KeyCombo {
    keys: SmallVec<[KeyCode; 4]>,
}

impl KeyCombo {
    pub fn new() -> KeyCombo {
        KeyCombo::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    /// Adds a key, returning `false` if it was already present.
    pub fn push(&mut self, key: KeyCode) -> bool {
        if self.contains(key) {
            return false;
        }

        self.keys.push(key);
        true
    }

    pub fn remove(&mut self, key: KeyCode) -> bool {
        let Some(index) = self.keys.iter().position(|&k| k == key) else {
            return false;
        };

        self.keys.remove(index);
        true
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.keys.iter().copied()
    }

    /// Like `==`, but an empty combination never matches anything.
    pub fn matches(&self, other: &KeyCombo) -> bool {
        !self.is_empty() && self == other
    }

    fn sorted(&self) -> SmallVec<[KeyCode; 4]> {
        let mut keys = self.keys.clone();
        keys.sort_unstable();
        keys
    }
}

impl PartialEq for KeyCombo {
    fn eq(&self, other: &KeyCombo) -> bool {
        self.len() == other.len() && self.iter().all(|key| other.contains(key))
    }
}

impl Eq for KeyCombo {}

impl Hash for KeyCombo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted().hash(state);
    }
}

impl FromIterator<KeyCode> for KeyCombo {
    fn from_iter<I: IntoIterator<Item = KeyCode>>(iter: I) -> KeyCombo {
        let mut combo = KeyCombo::new();
        for key in iter {
            combo.push(key);
        }
        combo
    }
}

impl<'de> Deserialize<'de> for KeyCombo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<KeyCombo, D::Error> {
        let keys = SmallVec::<[KeyCode; 4]>::deserialize(deserializer)?;
        Ok(keys.into_iter().collect())
    }
}

impl<const N: usize> From<[u32; N]> for KeyCombo {
    fn from(codes: [u32; N]) -> KeyCombo {
        codes.into_iter().map(KeyCode).collect()
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("No Keybind");
        }

        for (i, key) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{key}")?;
        }

        Ok(())
    }
}

fn key_name(code: u32) -> Option<&'static str> {
    let name = match code {
        0 => "\\",
        1 => "ESC",
        2 => "1",
        3 => "2",
        4 => "3",
        5 => "4",
        6 => "5",
        7 => "6",
        8 => "7",
        9 => "8",
        10 => "9",
        11 => "0",
        12 => "-",
        13 => "=",
        14 => "Backspace",
        15 => "Tab",
        16 => "Q",
        17 => "W",
        18 => "E",
        19 => "R",
        20 => "T",
        21 => "Y",
        22 => "U",
        23 => "I",
        24 => "O",
        25 => "P",
        26 => "[",
        27 => "]",
        28 => "Return",
        29 => "Ctrl",
        30 => "A",
        31 => "S",
        32 => "D",
        33 => "F",
        34 => "G",
        35 => "H",
        36 => "J",
        37 => "K",
        38 => "L",
        39 => ";",
        40 => "'",
        41 => "`",
        42 => "Shift",
        43 => "\\",
        44 => "Z",
        45 => "X",
        46 => "C",
        47 => "V",
        48 => "B",
        49 => "N",
        50 => "M",
        51 => ",",
        52 => ".",
        53 => "/",
        54 => "Right Shift",
        55 => "Numpad *",
        56 => "Alt",
        57 => "Space",
        58 => "Caps Lock",
        59 => "F1",
        60 => "F2",
        61 => "F3",
        62 => "F4",
        63 => "F5",
        64 => "F6",
        65 => "F7",
        66 => "F8",
        67 => "F9",
        68 => "F10",
        69 => "Num Lock",
        70 => "Scr Lock",
        71 => "Numpad 7",
        72 => "Numpad 8",
        73 => "Numpad 9",
        74 => "Numpad -",
        75 => "Numpad 4",
        76 => "Numpad 5",
        77 => "Numpad 6",
        78 => "Numpad +",
        79 => "Numpad 1",
        80 => "Numpad 2",
        81 => "Numpad 3",
        82 => "Numpad 0",
        83 => "Numpad .",
        86 => "International",
        87 => "F11",
        88 => "F12",
        156 => "Numpad Enter",
        157 => "Right Ctrl",
        181 => "Numpad /",
        183 => "Prt Sc",
        184 => "Right Alt",
        197 => "Pause",
        199 => "Home",
        200 => "Cursor Up",
        201 => "PgUp",
        203 => "Cursor Left",
        205 => "Cursor Right",
        207 => "End",
        208 => "Cursor Down",
        209 => "PgDn",
        210 => "Insert",
        211 => "Delete",
        219 => "OS",
        220 => "Right OS",
        221 => "Menu",
        3612 => "Numpad Enter",
        3613 => "Right Control",
        3637 => "Numpad /",
        3639 => "PrintScrn",
        3640 => "Right Alt",
        3653 => "Break",
        3655 => "Numpad Home",
        3657 => "Numpad PgUp",
        3663 => "Numpad End",
        3665 => "Numpad PgDn",
        3666 => "Numpad Ins",
        3667 => "Numpad Del",
        3675 => "OS",
        3677 => "Right Meta",
        57360 => "Rewind",
        57369 => "Forward",
        57376 => "Volume Toggle",
        57378 => "Play/Pause",
        57380 => "Stop",
        57390 => "Volume Down",
        57392 => "Volume Up",
        57394 => "Homepage",
        57416 => "Numpad Up",
        57419 => "Numpad Left",
        57420 => "Numpad Mid",
        57421 => "Numpad Right",
        57424 => "Numpad Down",
        57445 => "Search",
        57453 => "Media Player",
        60999 => "Home",
        61000 => "Up",
        61001 => "PgUp",
        61003 => "Left",
        61005 => "Right",
        61007 => "End",
        61008 => "Down",
        61009 => "PgDn",
        61010 => "Ins",
        61011 => "Del",
        _ => return None,
    };

    Some(name)
}
