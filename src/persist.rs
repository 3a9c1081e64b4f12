//! Item values ⇄ persistent store.
//!
//! Values are written menu by menu, item by item, in tree order, each at
//! the address right after the previous one. [`load`] walks the same order,
//! so the tree must not be reshaped between a save and a load.
//!
//! [`ImageStore`] is the RAM image the firmware keeps in front of flash:
//!
//! ```text
//!   addr  0        4        8        12
//!         ┌────────┬────────┬────────┬──── ...
//!         │ i32 LE │ i32 LE │ i32 LE │
//!         └────────┴────────┴────────┴──── ...
//!          item 0   item 1   item 2
//! ```

use crate::hal::PersistentStore;
use crate::menu::MenuTree;

/// Bytes used by one stored integer.
pub const INT_WIDTH: usize = 4;

/// Write every item value. Returns the total number of bytes written.
pub fn save<S: PersistentStore>(tree: &MenuTree, store: &mut S) -> usize {
    let mut address = 0;
    for item in tree.items() {
        address += store.write_int(address, item.value);
    }
    debug!("saved {} bytes", address);
    address
}

/// Read every item value back in [`save`] order.
///
/// Whatever the store returns is taken as is, including zero for reads
/// past its end. Returns the total number of bytes read.
pub fn load<S: PersistentStore>(tree: &mut MenuTree, store: &mut S) -> usize {
    let mut address = 0;
    for item in tree.items_mut() {
        let (value, read) = store.read_int(address);
        item.value = value;
        address += read;
    }
    debug!("loaded {} bytes", address);
    address
}

/// Fixed-size byte image addressed as little-endian `i32`s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageStore<const N: usize> {
    image: [u8; N],
    /// True if the image differs from what was last synced.
    dirty: bool,
}

impl<const N: usize> ImageStore<N> {
    /// Zero-filled image.
    pub const fn new() -> Self {
        Self {
            image: [0; N],
            dirty: false,
        }
    }

    /// Replace the image with bytes read from the backing medium.
    ///
    /// Shorter input leaves the remaining bytes zeroed.
    pub fn load_bytes(&mut self, bytes: &[u8]) {
        self.image = [0; N];
        let n = bytes.len().min(N);
        self.image[..n].copy_from_slice(&bytes[..n]);
        self.dirty = false;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.image
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the image as synced.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn slot(address: usize) -> Option<core::ops::Range<usize>> {
        let end = address.checked_add(INT_WIDTH)?;
        (end <= N).then_some(address..end)
    }
}

impl<const N: usize> Default for ImageStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PersistentStore for ImageStore<N> {
    fn write_int(&mut self, address: usize, value: i32) -> usize {
        let Some(range) = Self::slot(address) else {
            warn!("store: write past end at {}", address);
            return 0;
        };
        let bytes = value.to_le_bytes();
        if self.image[range.clone()] != bytes {
            self.image[range].copy_from_slice(&bytes);
            self.dirty = true;
        }
        INT_WIDTH
    }

    fn read_int(&mut self, address: usize) -> (i32, usize) {
        let Some(range) = Self::slot(address) else {
            warn!("store: read past end at {}", address);
            return (0, 0);
        };
        let mut bytes = [0u8; INT_WIDTH];
        bytes.copy_from_slice(&self.image[range]);
        (i32::from_le_bytes(bytes), INT_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::catalog::default_tree;
    use crate::menu::{Menu, MenuItem};

    fn tree() -> MenuTree {
        MenuTree::new([
            Menu::new(
                "A",
                &[
                    MenuItem::counter("a1", 7, -10, 10),
                    MenuItem::counter("a2", -3, -10, 10),
                ],
            )
            .unwrap(),
            Menu::new("B", &[MenuItem::number("b1", 160_000_000, 0, 999_999_999)]).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn save_writes_values_in_tree_order() {
        let mut store = ImageStore::<16>::new();
        assert_eq!(save(&tree(), &mut store), 12);
        assert!(store.is_dirty());
        assert_eq!(&store.as_bytes()[0..4], &7i32.to_le_bytes());
        assert_eq!(&store.as_bytes()[4..8], &(-3i32).to_le_bytes());
        assert_eq!(&store.as_bytes()[8..12], &160_000_000i32.to_le_bytes());
    }

    #[test]
    fn load_restores_saved_values() {
        let mut store = ImageStore::<16>::new();
        let original = tree();
        save(&original, &mut store);

        let mut restored = tree();
        for item in restored.items_mut() {
            item.value = 0;
        }
        assert_eq!(load(&mut restored, &mut store), 12);
        assert!(original
            .items()
            .zip(restored.items())
            .all(|(a, b)| a.value == b.value));
    }

    #[test]
    fn short_store_loads_zero_for_missing_values() {
        let mut store = ImageStore::<8>::new();
        let mut t = tree();
        assert_eq!(save(&t, &mut store), 8, "third value does not fit");
        assert_eq!(load(&mut t, &mut store), 8);
        let values: heapless::Vec<i32, 3> = t.items().map(|it| it.value).collect();
        assert_eq!(values.as_slice(), &[7, -3, 0]);
    }

    #[test]
    fn rewriting_the_same_value_keeps_image_clean() {
        let mut store = ImageStore::<8>::new();
        store.write_int(0, 5);
        store.mark_clean();
        store.write_int(0, 5);
        assert!(!store.is_dirty());
        store.write_int(0, 6);
        assert!(store.is_dirty());
    }

    #[test]
    fn load_bytes_pads_and_clears_dirty() {
        let mut store = ImageStore::<8>::new();
        store.write_int(4, 9);
        store.load_bytes(&1i32.to_le_bytes());
        assert!(!store.is_dirty());
        assert_eq!(store.read_int(0), (1, 4));
        assert_eq!(store.read_int(4), (0, 4));
        assert_eq!(store.read_int(6), (0, 0));
    }

    #[test]
    fn default_catalog_fits_the_image() {
        let mut store = ImageStore::<{ crate::config::STORE_IMAGE_SIZE }>::new();
        let t = default_tree().unwrap();
        assert_eq!(save(&t, &mut store), t.items().count() * INT_WIDTH);
    }
}
