use super::types::{Key, KEY_TABLE_SIZE};

/// Fixed-size key-held table indexed by [`Key::code`].
#[derive(Clone, PartialEq, Eq)]
pub struct KeyTable {
    down: [bool; KEY_TABLE_SIZE],
}

impl KeyTable {
    pub const fn new() -> Self {
        Self { down: [false; KEY_TABLE_SIZE] }
    }

    /// Records `key` as held or released.
    ///
    /// Returns `false` (and changes nothing) for keys without a table slot.
    pub fn set(&mut self, key: Key, down: bool) -> bool {
        match key.code() {
            Some(code) => {
                self.down[code] = down;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn is_down(&self, key: Key) -> bool {
        key.code().is_some_and(|code| self.down[code])
    }

    /// Raw slot access, for consumers that index by code.
    #[inline]
    pub fn is_code_down(&self, code: usize) -> bool {
        self.down.get(code).copied().unwrap_or(false)
    }

    /// Iterates the keys currently held, in code order.
    pub fn iter_down(&self) -> impl Iterator<Item = Key> + '_ {
        self.down
            .iter()
            .enumerate()
            .filter(|&(_, &down)| down)
            .filter_map(|(code, _)| Key::from_code(code))
    }

    pub fn clear(&mut self) {
        self.down = [false; KEY_TABLE_SIZE];
    }
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter_down()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_query() {
        let mut t = KeyTable::new();
        assert!(t.set(Key::Tab, true));
        assert!(t.is_down(Key::Tab));
        assert!(t.is_code_down(9));
        t.set(Key::Tab, false);
        assert!(!t.is_down(Key::Tab));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut t = KeyTable::new();
        assert!(!t.set(Key::Unknown(77), true));
        assert_eq!(t.iter_down().count(), 0);
    }

    #[test]
    fn out_of_range_code_reads_as_up() {
        assert!(!KeyTable::new().is_code_down(KEY_TABLE_SIZE + 10));
    }

    #[test]
    fn iter_down_lists_held_keys_in_code_order() {
        let mut t = KeyTable::new();
        t.set(Key::Z, true);
        t.set(Key::A, true);
        t.set(Key::F1, true);
        assert_eq!(t.iter_down().collect::<Vec<_>>(), vec![Key::A, Key::Z, Key::F1]);
    }
}
