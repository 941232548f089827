//! Passability of every tile in the dungeon tileset.

use dungeonion_core::{Channel, TileId};

/// Passability of a single tile type on both channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileProperties {
    description: &'static str,
    physical: bool,
    magic: bool,
}

impl TileProperties {
    /// Properties used for tiles missing from the table.
    pub const UNKNOWN: TileProperties = TileProperties::new("Unknown", true, true);

    /// Creates a new property record.
    #[must_use]
    pub const fn new(description: &'static str, physical: bool, magic: bool) -> Self {
        Self {
            description,
            physical,
            magic,
        }
    }

    /// Human readable name of the tile.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Reports whether the tile lets bodies travelling on `channel` through.
    #[must_use]
    pub const fn passable(&self, channel: Channel) -> bool {
        match channel {
            Channel::Physical => self.physical,
            Channel::Magic => self.magic,
        }
    }
}

/// Immutable lookup from tile identifier to passability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TilePropertyTable {
    entries: &'static [TileProperties],
}

impl TilePropertyTable {
    /// Table describing the dungeon tileset.
    #[must_use]
    pub const fn dungeon() -> Self {
        Self {
            entries: &DUNGEON_TILES,
        }
    }

    /// Number of tile types known to the table.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the table knows no tile types.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reports whether the table has an entry for `tile`.
    #[must_use]
    pub fn contains(&self, tile: TileId) -> bool {
        (tile.get() as usize) < self.entries.len()
    }

    /// Looks up a tile; unknown identifiers pass both channels.
    #[must_use]
    pub fn get(&self, tile: TileId) -> TileProperties {
        self.entries
            .get(tile.get() as usize)
            .copied()
            .unwrap_or(TileProperties::UNKNOWN)
    }
}

impl Default for TilePropertyTable {
    fn default() -> Self {
        Self::dungeon()
    }
}

const DUNGEON_TILES: [TileProperties; 132] = [
    TileProperties::new("Stone Wall Top Left Corner", false, false),
    TileProperties::new("Stone Wall Top", false, false),
    TileProperties::new("Stone Wall Top Right Corner", false, false),
    TileProperties::new("Stone Wall Top T-Junction Down", false, false),
    TileProperties::new("Stone Wall Top End (Cap Right)", false, false),
    TileProperties::new("Stone Wall Top End (Cap Left)", false, false),
    TileProperties::new("Stone Wall Top with Shield", false, false),
    TileProperties::new("Stone Wall Top (Single Block)", false, false),
    TileProperties::new("Stone Wall Top (Detailed)", false, false),
    TileProperties::new("Stone Wall Top (Pillar Top Left)", false, false),
    TileProperties::new("Stone Wall Top (Pillar Top Right)", false, false),
    TileProperties::new("Stone Wall Top (Archway Top)", false, false),
    TileProperties::new("Stone Wall Left Side", false, false),
    TileProperties::new("Stone Wall Center Block", false, false),
    TileProperties::new("Stone Wall with Banner", false, false),
    TileProperties::new("Stone Wall Right Side", false, false),
    TileProperties::new("Stone Wall with Barred Window", false, false),
    TileProperties::new("Stone Wall (Plain)", false, false),
    TileProperties::new("Stone Wall with Shield Emblem", false, false),
    TileProperties::new("Stone Wall (Detailed Center)", false, false),
    TileProperties::new("Stone Wall (Pillar Mid Left)", false, false),
    TileProperties::new("Stone Wall (Pillar Mid Right)", false, false),
    TileProperties::new("Stone Wall (Archway Mid Left)", false, false),
    TileProperties::new("Stone Wall (Archway Mid Right)", false, false),
    TileProperties::new("Dirt Floor Edge (Top Left)", true, true),
    TileProperties::new("Dirt Floor", true, true),
    TileProperties::new("Dirt Floor with Pebbles", true, true),
    TileProperties::new("Dirt Floor Edge (Top Right)", true, true),
    TileProperties::new("Wooden Plank Floor (Vertical)", true, true),
    TileProperties::new("Wooden Plank Floor (Horizontal)", true, true),
    TileProperties::new("Wooden Plank Floor (Cross)", true, true),
    TileProperties::new("Floor Grate", true, true),
    TileProperties::new("Stone Brick Floor", true, true),
    TileProperties::new("Stone Slab Floor", true, true),
    TileProperties::new("Stone Wall (Pillar Base Left)", false, false),
    TileProperties::new("Stone Wall (Pillar Base Right)", false, false),
    TileProperties::new("Stone Floor (Light, Cracked)", true, true),
    TileProperties::new("Stone Floor (Light, Plain)", true, true),
    TileProperties::new("Stone Floor (Common Grey)", true, true),
    TileProperties::new("Stone Floor (Darker Grey)", true, true),
    TileProperties::new("Wooden Beam/Low Wall Base", false, false),
    TileProperties::new("Wooden Beam/Low Wall End", false, false),
    TileProperties::new("Stone Floor (Patterned)", true, true),
    TileProperties::new("Stone Floor (Small Tiles)", true, true),
    TileProperties::new("Stone Floor (Large Tile Center)", true, true),
    TileProperties::new("Stone Floor (Stairs Illusion Up Left)", true, true),
    TileProperties::new("Stone Floor (Stairs Illusion Up Right)", true, true),
    TileProperties::new("Stone Floor (Stairs Illusion Down)", true, true),
    TileProperties::new("UI Element (Selection Box Corner)", true, true),
    TileProperties::new("UI Element (Selection Box Edge)", true, true),
    TileProperties::new("UI Element (Slash Icon)", true, true),
    TileProperties::new("Sand/Light Dirt Floor", true, true),
    TileProperties::new("Minecart Track (Horizontal)", true, true),
    TileProperties::new("Minecart Track (Vertical)", true, true),
    TileProperties::new("Minecart Track (Curve Bottom-Right)", true, true),
    TileProperties::new("Minecart Track (Curve Top-Right)", true, true),
    TileProperties::new("Minecart Track End/Buffer", true, true),
    TileProperties::new("Barrel", false, false),
    TileProperties::new("Crate", false, false),
    TileProperties::new("Chest (Closed, Brown)", false, false),
    TileProperties::new("Wooden Door (Closed, Vertical)", false, false),
    TileProperties::new("Wooden Door (Closed, Horizontal)", false, false),
    TileProperties::new("Metal Door/Gate (Closed)", false, false),
    TileProperties::new("Barrel (Side View)", false, false),
    TileProperties::new("Crate Stack", false, false),
    TileProperties::new("Chest (Open, Empty)", true, true),
    TileProperties::new("Chest (Closed, Red/Gold)", false, false),
    TileProperties::new("Minecart (Empty)", false, false),
    TileProperties::new("Minecart Track Intersection", true, true),
    TileProperties::new("Minecart Track (Horizontal, Darker)", true, true),
    TileProperties::new("Minecart Track (Curve Top-Left)", true, true),
    TileProperties::new("Stone Column/Pillar Base", false, false),
    TileProperties::new("Entity Sprite: Knight", false, false),
    TileProperties::new("Entity Sprite: Archer", false, false),
    TileProperties::new("Entity Sprite: Female Warrior", false, false),
    TileProperties::new("Entity Sprite: Mage/Civilian", false, false),
    TileProperties::new("Entity Sprite: King/Noble", false, false),
    TileProperties::new("Entity Sprite: Old Man/Merchant", false, false),
    TileProperties::new("Entity Sprite: Guard", false, false),
    TileProperties::new("Entity Sprite: Hooded Figure", false, false),
    TileProperties::new("Entity Sprite: Female Civilian", false, false),
    TileProperties::new("Entity Sprite: Child/Small Figure", false, false),
    TileProperties::new("Entity Sprite: Male Civilian", false, false),
    TileProperties::new("Entity Sprite: Dark Knight", false, false),
    TileProperties::new("Entity Sprite: Player Wizard", false, false),
    TileProperties::new("Entity Sprite: Alt Hero 1", false, false),
    TileProperties::new("Entity Sprite: Alt Hero 2", false, false),
    TileProperties::new("Entity Sprite: Alt Hero 3", false, false),
    TileProperties::new("Entity Sprite: Alt Hero 4", false, false),
    TileProperties::new("Entity Sprite: Alt Hero 5", false, false),
    TileProperties::new("Entity Sprite: Alt Hero 6", false, false),
    TileProperties::new("Entity Sprite: Alt Hero 7", false, false),
    TileProperties::new("Entity Sprite: Alt Hero 8", false, false),
    TileProperties::new("Entity Sprite: Alt Hero 9", false, false),
    TileProperties::new("Entity Sprite: Alt Hero 10", false, false),
    TileProperties::new("Entity Sprite: Alt Hero 11", false, false),
    TileProperties::new("Entity Sprite: Goblin", false, false),
    TileProperties::new("Entity Sprite: Skeleton", false, false),
    TileProperties::new("Entity Sprite: Orc/Green Monster", false, false),
    TileProperties::new("Entity Sprite: Slime", false, false),
    TileProperties::new("Entity Sprite: Eye Monster", false, false),
    TileProperties::new("Entity Sprite: Mushroom Monster", false, false),
    TileProperties::new("Entity Sprite: Snake/Worm", false, false),
    TileProperties::new("Entity Sprite: Zombie/Ghoul", false, false),
    TileProperties::new("Entity Sprite: Imp/Small Demon", false, false),
    TileProperties::new("Entity Sprite: Large Orc/Brute", false, false),
    TileProperties::new("Entity Sprite: Wolf/Dog", false, false),
    TileProperties::new("Entity Sprite: Minotaur/Beastman", false, false),
    TileProperties::new("Entity Sprite: Bat", false, false),
    TileProperties::new("Entity Sprite: Ghost", false, false),
    TileProperties::new("Entity Sprite: Crab", false, false),
    TileProperties::new("Entity Sprite: Small Spider", false, false),
    TileProperties::new("Item Sprite: Small Chest/Box", true, true),
    TileProperties::new("Item Sprite: Red Potion (Small)", true, true),
    TileProperties::new("Item Sprite: Blue Potion (Small)", true, true),
    TileProperties::new("Item Sprite: Red Potion (Large)", true, true),
    TileProperties::new("Item Sprite: Blue Potion (Large)", true, true),
    TileProperties::new("Item Sprite: Sword", true, true),
    TileProperties::new("Item Sprite: Axe", true, true),
    TileProperties::new("Item Sprite: Dagger", true, true),
    TileProperties::new("Entity Sprite: Bat (Flying)", false, false),
    TileProperties::new("Entity Sprite: Ghost (Floating)", false, false),
    TileProperties::new("Entity Sprite: Spider (Large)", false, false),
    TileProperties::new("Entity Sprite: Elemental/Goo", false, false),
    TileProperties::new("Item Sprite: Green Potion (Small)", true, true),
    TileProperties::new("Item Sprite: Yellow Potion (Small)", true, true),
    TileProperties::new("Item Sprite: Green Potion (Large)", true, true),
    TileProperties::new("Item Sprite: Yellow Potion (Large)", true, true),
    TileProperties::new("Item Sprite: Bow", true, true),
    TileProperties::new("Item Sprite: Staff", true, true),
    TileProperties::new("Item Sprite: Mace", true, true),
    TileProperties::new("Empty/Dark Floor Tile", true, true),
];
