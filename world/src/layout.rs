//! Raw layer placed over the floor of the default dungeon.

/// Columns of the default dungeon.
pub(crate) const COLUMNS: u32 = 32;

/// Rows of the default dungeon.
pub(crate) const ROWS: u32 = 20;

/// Row-major tile references as exported by the level editor.
///
/// The upper nibble carries flip flags and indices are one-based; see
/// [`decode`]. The export is two entries short, so the tail is padded with
/// empty references.
#[rustfmt::skip]
pub(crate) const DUNGEON_LAYER: [u32; 640] = [
    14, 1610612787, 16, 1, 1, 3221225485, 1, 1, 1, 2, 3, 3, 3, 3, 3, 4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    14, 1610612787, 17, 3, 3, 4, 1, 1, 1, 14, 41, 41, 41, 41, 41, 16, 1, 1, 1, 1, 1, 25, 1, 1, 1, 1, 1, 1, 1, 1, 1073741837, 1,
    14, 1610612787, 58, 41, 41, 16, 25, 1, 1, 14, 1610612789, 51, 51, 52, 51, 16, 2, 3, 4, 1, 1, 1, 1, 2, 3, 7, 3, 3, 3, 7, 3, 4,
    14, 1610612787, 51, 52, 51, 16, 1, 1, 1, 14, 1610612787, 49, 3221225522, 49, 49, 16, 14, 41, 16, 1, 1, 536870925, 1, 14, 41, 19, 41, 30, 41, 19, 41, 16,
    14, 1610612787, 5, 27, 27, 28, 1, 1073741837, 1, 14, 1610612787, 49, 49, 49, 49, 16, 14, 1610612789, 16, 1, 1, 1, 1073741837, 14, 1610612789, 31, 51, 51, 52, 31, 51, 16,
    14, 1610612787, 16, 2, 3, 3, 3, 3, 4, 26, 27, 27, 27, 27, 27, 28, 14, 1610612787, 17, 7, 3, 3, 4, 14, 1610612787, 49, 49, 49, 49, 49, 49, 16,
    14, 1610612787, 16, 14, 41, 41, 41, 41, 17, 3, 3, 3, 3, 4, 1, 1, 14, 1610612787, 58, 19, 41, 41, 16, 14, 1610612787, 49, 49, 49, 49, 49, 49, 16,
    18, 1610612787, 17, 18, 1610612789, 51, 52, 51, 58, 41, 41, 22, 41, 16, 2684354573, 1, 14, 1610612787, 51, 31, 51, 51, 16, 14, 1610612787, 49, 49, 49, 49, 49, 49, 16,
    60, 1610612787, 58, 60, 1610612787, 49, 49, 49, 51, 51, 51, 51, 51, 17, 3, 3, 18, 1610612787, 49, 43, 49, 3221225522, 17, 18, 1610612787, 49, 49, 49, 49, 49, 2684354610, 17,
    51, 54, 51, 51, 54, 43, 49, 50, 49, 49, 49, 49, 49, 58, 41, 41, 60, 1610612787, 49, 49, 43, 49, 58, 60, 37, 38, 38, 38, 38, 38, 39, 58,
    49, 43, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 51, 52, 51, 51, 54, 49, 49, 49, 49, 51, 52, 54, 49, 49, 49, 49, 49, 49, 51,
    49, 49, 49, 5, 27, 6, 1610612790, 49, 49, 2147483698, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 5, 27, 27, 27, 27, 27, 27, 27, 27,
    49, 49, 49, 16, 1, 14, 1610612787, 49, 49, 49, 49, 49, 49, 5, 27, 27, 27, 27, 27, 27, 6, 1610612790, 49, 16, 1, 1, 1, 1, 1, 1, 1, 1,
    27, 27, 27, 28, 3221225485, 14, 1610612787, 49, 49, 5, 27, 27, 27, 28, 2, 3, 3, 3, 3, 3, 18, 1610612787, 49, 16, 1, 1, 1, 2, 3, 3, 3, 3,
    1, 1, 1, 1, 2, 18, 1610612787, 49, 49, 17, 3, 4, 1, 1, 14, 41, 20, 41, 41, 21, 60, 1610612787, 49, 16, 1, 1, 1073741837, 14, 41, 11, 12, 41,
    1, 2, 3, 3, 18, 60, 1610612787, 49, 49, 58, 41, 17, 3, 3, 18, 1610612789, 32, 51, 51, 33, 51, 54, 2147483698, 16, 1, 1, 1, 14, 1610612789, 51, 51, 51,
    1, 14, 41, 41, 60, 1610612789, 54, 49, 49, 51, 51, 58, 41, 41, 60, 1610612787, 49, 43, 49, 49, 49, 49, 49, 17, 3, 3, 3, 18, 1610612787, 49, 49, 49,
    1, 14, 1610612789, 52, 51, 54, 49, 49, 2147483698, 42, 49, 51, 51, 51, 51, 54, 43, 49, 49, 49, 49, 49, 49, 58, 41, 41, 41, 60, 1610612787, 49, 49, 49,
    1, 14, 1610612787, 3758096434, 49, 49, 49, 49, 49, 3758096434, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 43, 49, 51, 51, 51, 51, 51, 54, 49, 49, 49,
    1, 14, 1610612787, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 3758096434, 49,
    0, 0,
];

/// Strips flip flags and converts a raw reference to a tile index.
///
/// Returns `None` for empty references.
pub(crate) fn decode(raw: u32) -> Option<u32> {
    (raw & 0x0FFF_FFFF).checked_sub(1)
}
