//! Board topology mapper.
//!
//! Pure generation of the canonical 40-slot board and the mapping from
//! a linear slot index to an 11x11 grid coordinate for rendering. Tile
//! ownership is dynamic session state owned by the engine and is not
//! part of this catalog.

use serde::{Deserialize, Serialize};

/// Number of slots on the board ring.
pub const BOARD_SIZE: usize = 40;

/// Slot indices reserved for gamble tiles, one per 10-tile edge.
pub const GAMBLE_INDICES: [usize; 4] = [9, 19, 29, 39];

/// District catalog in board order: (label, base price, base fare).
pub const DISTRICTS: [(&str, i64, i64); 9] = [
    ("Brown", 60, 30),
    ("Light Blue", 80, 40),
    ("Pink", 100, 50),
    ("Orange", 120, 60),
    ("Red", 150, 75),
    ("Yellow", 180, 90),
    ("Green", 220, 110),
    ("Dark Blue", 280, 140),
    ("Purple", 320, 160),
];

/// One immutable board slot, derived purely from its index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BoardTile {
    Property {
        index: usize,
        name: String,
        color: String,
        price: i64,
        fare: i64,
    },
    Gamble {
        index: usize,
        name: String,
    },
}

impl BoardTile {
    pub fn index(&self) -> usize {
        match self {
            BoardTile::Property { index, .. } | BoardTile::Gamble { index, .. } => *index,
        }
    }
}

/// Generate the full 40-slot catalog.
///
/// The four gamble slots sit at the last index of each edge; the
/// remaining 36 slots are assigned to 9 districts of 4 consecutive
/// tiles, with price and fare increasing by fixed increments within a
/// district.
pub fn generate_board() -> Vec<BoardTile> {
    let mut board = Vec::with_capacity(BOARD_SIZE);
    let mut property_idx = 0usize;
    let mut gamble_count = 0usize;

    for index in 0..BOARD_SIZE {
        if GAMBLE_INDICES.contains(&index) {
            gamble_count += 1;
            board.push(BoardTile::Gamble {
                index,
                name: format!("Gamble Zone {gamble_count}"),
            });
        } else {
            let (color, base_price, base_fare) = DISTRICTS[property_idx / 4];
            let position = (property_idx % 4) as i64;
            board.push(BoardTile::Property {
                index,
                name: format!("{} Property {}", color, position + 1),
                color: color.to_string(),
                price: base_price + position * 10,
                fare: base_fare + position * 5,
            });
            property_idx += 1;
        }
    }

    board
}

/// Map a slot index onto the perimeter of an 11x11 grid.
///
/// Indices 0..=10 run along the bottom edge right-to-left, 11..=19 up
/// the left edge, 20..=30 along the top edge left-to-right, and
/// 31..=39 down the right edge. Corners 0, 10, 20 and 30 land on the
/// grid corners, making the mapping a bijection onto the 40 perimeter
/// cells.
pub fn position_of(index: usize) -> (usize, usize) {
    assert!(index < BOARD_SIZE, "slot index out of range: {index}");
    match index {
        0..=10 => (10, 10 - index),
        11..=19 => (20 - index, 0),
        20..=30 => (0, index - 20),
        _ => (index - 30, 10),
    }
}
