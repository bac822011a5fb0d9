//! Level layouts and the built-in campaign.
//!
//! The engine only consumes an abstract [`LevelLayout`]: a grid of [`Tile`]
//! symbols plus enemy and power-up spawn coordinates. Where layouts come
//! from is up to a [`LevelProvider`]. [`BuiltinLevels`] ships the four fixed
//! stages as ASCII maps:
//!
//! | Symbol | Tile |
//! |--------|------|
//! | `.` | empty |
//! | `B` | brick |
//! | `R` | cracked brick |
//! | `W` | water |
//! | `S` | stone |
//! | `T` | tree |
//! | `J` | positive-slope mirror |
//! | `L` | negative-slope mirror |
//! | `C` | castle anchor |
//! | `P` | player anchor (first one only) |
//! | `E` | enemy anchor and enemy spawn point |
//! | `*` | power-up spawn point |
//!
//! Any other character reads as empty.

use serde::{Deserialize, Serialize};

use crate::error::LevelError;

/// One cell of a level layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    /// Nothing.
    #[default]
    Empty,
    /// Full-strength brick.
    Brick,
    /// Brick with one hit-point left.
    CrackedBrick,
    /// Water.
    Water,
    /// Indestructible stone.
    Stone,
    /// Tree canopy.
    Tree,
    /// Mirror running bottom-left to top-right.
    MirrorPositive,
    /// Mirror running top-left to bottom-right.
    MirrorNegative,
    /// Castle anchor.
    Castle,
    /// Player anchor.
    PlayerSpawn,
    /// Enemy anchor.
    EnemySpawn,
}

impl Tile {
    /// Reads a map symbol. Unknown symbols are empty.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Self {
        match symbol {
            'B' => Self::Brick,
            'R' => Self::CrackedBrick,
            'W' => Self::Water,
            'S' => Self::Stone,
            'T' => Self::Tree,
            'J' => Self::MirrorPositive,
            'L' => Self::MirrorNegative,
            'C' => Self::Castle,
            'P' => Self::PlayerSpawn,
            'E' => Self::EnemySpawn,
            _ => Self::Empty,
        }
    }

    /// Map symbol for this tile.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Brick => 'B',
            Self::CrackedBrick => 'R',
            Self::Water => 'W',
            Self::Stone => 'S',
            Self::Tree => 'T',
            Self::MirrorPositive => 'J',
            Self::MirrorNegative => 'L',
            Self::Castle => 'C',
            Self::PlayerSpawn => 'P',
            Self::EnemySpawn => 'E',
        }
    }
}

/// Terrain and spawn points for one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelLayout {
    tiles: Vec<Vec<Tile>>,
    enemy_spawns: Vec<(usize, usize)>,
    powerup_spawns: Vec<(usize, usize)>,
}

impl LevelLayout {
    /// Builds a layout from its parts.
    #[must_use]
    pub fn new(
        tiles: Vec<Vec<Tile>>,
        enemy_spawns: Vec<(usize, usize)>,
        powerup_spawns: Vec<(usize, usize)>,
    ) -> Self {
        Self {
            tiles,
            enemy_spawns,
            powerup_spawns,
        }
    }

    /// Parses the ASCII map form. Blank lines are skipped.
    ///
    /// ```
    /// use citadel_core::level::{LevelLayout, Tile};
    ///
    /// let layout = LevelLayout::parse("E.*\n.BP\nPJ?");
    /// assert_eq!(layout.tile(1, 1), Some(Tile::Brick));
    /// assert_eq!(layout.tile(2, 0), Some(Tile::Empty));
    /// assert_eq!(layout.tile(2, 2), Some(Tile::Empty));
    /// assert_eq!(layout.enemy_spawns(), &[(0, 0)]);
    /// assert_eq!(layout.powerup_spawns(), &[(0, 2)]);
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut tiles = Vec::new();
        let mut enemy_spawns = Vec::new();
        let mut powerup_spawns = Vec::new();
        let mut player_seen = false;

        for line in text.lines().map(str::trim_end).filter(|l| !l.is_empty()) {
            let row = tiles.len();
            let mut cells = Vec::with_capacity(line.len());
            for (col, symbol) in line.chars().enumerate() {
                let mut tile = Tile::from_symbol(symbol);
                match tile {
                    Tile::PlayerSpawn if player_seen => tile = Tile::Empty,
                    Tile::PlayerSpawn => player_seen = true,
                    Tile::EnemySpawn => enemy_spawns.push((row, col)),
                    _ if symbol == '*' => powerup_spawns.push((row, col)),
                    _ => {}
                }
                cells.push(tile);
            }
            tiles.push(cells);
        }

        Self {
            tiles,
            enemy_spawns,
            powerup_spawns,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.tiles.len()
    }

    /// Width of the widest row.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.tiles.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Tile at a cell, if inside the layout.
    #[must_use]
    pub fn tile(&self, row: usize, col: usize) -> Option<Tile> {
        self.tiles.get(row)?.get(col).copied()
    }

    /// Every tile with its cell, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.tiles.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, &tile)| (row, col, tile))
        })
    }

    /// Anchor of the player, if the layout has one.
    #[must_use]
    pub fn player_spawn(&self) -> Option<(usize, usize)> {
        self.tiles()
            .find(|&(_, _, tile)| tile == Tile::PlayerSpawn)
            .map(|(row, col, _)| (row, col))
    }

    /// Enemy spawn points in reading order.
    #[must_use]
    pub fn enemy_spawns(&self) -> &[(usize, usize)] {
        &self.enemy_spawns
    }

    /// Power-up spawn points in reading order.
    #[must_use]
    pub fn powerup_spawns(&self) -> &[(usize, usize)] {
        &self.powerup_spawns
    }

    /// Checks that every row has exactly `cols` tiles and there are `rows` rows.
    ///
    /// # Errors
    ///
    /// [`LevelError::Dimensions`] on any mismatch.
    pub fn check_dimensions(&self, rows: usize, cols: usize) -> Result<(), LevelError> {
        let ragged = self.tiles.iter().any(|r| r.len() != cols);
        if self.rows() != rows || ragged {
            return Err(LevelError::Dimensions {
                expected_rows: rows,
                expected_cols: cols,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(())
    }
}

/// Source of level layouts, indexed from 1.
pub trait LevelProvider {
    /// Number of playable levels.
    fn level_count(&self) -> u32;

    /// Layout for level `index`.
    ///
    /// # Errors
    ///
    /// [`LevelError::UnknownLevel`] if `index` is outside `1..=level_count()`.
    fn layout(&self, index: u32) -> Result<LevelLayout, LevelError>;
}

/// The four built-in stages.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLevels;

impl BuiltinLevels {
    /// Creates the built-in provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LevelProvider for BuiltinLevels {
    #[allow(clippy::cast_possible_truncation)]
    fn level_count(&self) -> u32 {
        STAGES.len() as u32
    }

    fn layout(&self, index: u32) -> Result<LevelLayout, LevelError> {
        let text = index
            .checked_sub(1)
            .and_then(|i| STAGES.get(i as usize))
            .ok_or(LevelError::UnknownLevel(index))?;
        Ok(LevelLayout::parse(text))
    }
}

/// A fixed list of layouts, level 1 first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelSet {
    levels: Vec<LevelLayout>,
}

impl LevelSet {
    /// Wraps a list of layouts.
    #[must_use]
    pub fn new(levels: Vec<LevelLayout>) -> Self {
        Self { levels }
    }

    /// Parses each map text into a level.
    #[must_use]
    pub fn from_maps<'a>(maps: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(maps.into_iter().map(LevelLayout::parse).collect())
    }
}

impl LevelProvider for LevelSet {
    #[allow(clippy::cast_possible_truncation)]
    fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }

    fn layout(&self, index: u32) -> Result<LevelLayout, LevelError> {
        index
            .checked_sub(1)
            .and_then(|i| self.levels.get(i as usize))
            .cloned()
            .ok_or(LevelError::UnknownLevel(index))
    }
}

const STAGES: [&str; 4] = [STAGE_1, STAGE_2, STAGE_3, STAGE_4];

const STAGE_1: &str = "\
E..............E..............E.\n\
................................\n\
................................\n\
................................\n\
..BB..BB..BB........BB..BB..BB..\n\
..BB..BB..BB........BB..BB..BB..\n\
..BB..BB..BB........BB..BB..BB..\n\
..BB..BB..BB........BB..BB..BB..\n\
..BB..BB..BB...JL...BB..BB..BB..\n\
..BB..BB..BB........BB..BB..BB..\n\
..BB..BB..BB........BB..BB..BB..\n\
..BB..BB..BB........BB..BB..BB..\n\
..........*...BBBB..............\n\
..............BBBB..............\n\
....SSSS......RRRR......SSSS....\n\
....SSSS......RRRR......SSSS....\n\
..*..........................*..\n\
................................\n\
..BB..BB..BB........BB..BB..BB..\n\
..BB..BB..BB........BB..BB..BB..\n\
..BB..BB..BB..TTTT..BB..BB..BB..\n\
..BB..BB..BB..TTTT..BB..BB..BB..\n\
..BB..BB..BB........BB..BB..BB..\n\
..BB..BB..BB........BB..BB..BB..\n\
..BB..BB..BB........BB..BB..BB..\n\
..BB..BB..BB........BB..BB..BB..\n\
................................\n\
................................\n\
................................\n\
..............BBBB..............\n\
..........P...BC.B..............\n\
..............B..B..............\n";

const STAGE_2: &str = "\
..E............E............E...\n\
................................\n\
................................\n\
................................\n\
....J......................L....\n\
................................\n\
......WWWWWWWWWWWWWWWWWWWW......\n\
......WWWWWWWWWWWWWWWWWWWW......\n\
................................\n\
...............*................\n\
..TT....BBBB........BBBB....TT..\n\
..TT....BBBB.R....R.BBBB....TT..\n\
..TT..........SSSS..........TT..\n\
..TT..........SSSS..........TT..\n\
..TT....BBBB..SSSS..BBBB....TT..\n\
..TT....BBBB..SSSS..BBBB....TT..\n\
..TT..........SSSS..........TT..\n\
..TT..........SSSS..........TT..\n\
..TT....BBBB..SSSS..BBBB....TT..\n\
..TT....BBBB..SSSS..BBBB....TT..\n\
..TT........................TT..\n\
..TT........................TT..\n\
......*..................*......\n\
................................\n\
......WWWWWW........WWWWWW......\n\
......WWWWWW........WWWWWW......\n\
................................\n\
....L......................J....\n\
................................\n\
..............BBBB..............\n\
...........P..BC.B..............\n\
..............B..B..............\n";

const STAGE_3: &str = "\
E.........E.........E.........E.\n\
................................\n\
............TTTTTTTT............\n\
............TTTTTTTT............\n\
..RR....BB....RR....BB....RR....\n\
..RR....BB....RR....BB....RR....\n\
................................\n\
...............*................\n\
..BB....RR....BB....RR....BB....\n\
..BB....RR....BB....RR....BB....\n\
.....L....................J.....\n\
................................\n\
..RR....BB....RR....BB....RR....\n\
..RR....BB....RR....BB....RR....\n\
SSSS........................SSSS\n\
SSSS........................SSSS\n\
..BB....RR....BB....RR....BB....\n\
..BB....RR....BLJ...RR....BB....\n\
................................\n\
................................\n\
..RR....BB.J..RR....LB....RR....\n\
..RR....BB....RR....BB....RR....\n\
................................\n\
...*........................*...\n\
..BB....RR....BB....RR....BB....\n\
..BB....RR....BB....RR....BB....\n\
................................\n\
................................\n\
................................\n\
..............BBBB..............\n\
........P.....BC.B..............\n\
..............B..B..............\n";

const STAGE_4: &str = "\
E.......E......E......E.......E.\n\
................................\n\
................................\n\
..............BBBB..............\n\
..............BBBB..............\n\
WWWWWWWWWWWW........WWWWWWWWWWWW\n\
WWWWWWWWWWWW........WWWWWWWWWWWW\n\
................................\n\
................................\n\
...J........................L...\n\
..........BBSSSSSSSSBB..........\n\
..........BBSSSSSSSSBB..........\n\
..........BB........BB..........\n\
..........BB...*....BB..........\n\
..........BB........BB..........\n\
..........BB..TTTT..BB..........\n\
..........BB..TTTT..BB..........\n\
..........BB........BB..........\n\
.....J....BB........BB....L.....\n\
..........BB........BB..........\n\
..*.......BB........BB.......*..\n\
..........BB........BB..........\n\
................................\n\
................................\n\
..RRRRRR................RRRRRR..\n\
..RRRRRR................RRRRRR..\n\
.............L....J.............\n\
................................\n\
................................\n\
..............BBBB..............\n\
..............BC.B...P..........\n\
..............B..B..............\n";

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_tests {
        use super::*;

        #[test]
        fn symbols_map_to_tiles() {
            let layout = LevelLayout::parse("BRWSTJLCPE.*x");
            let tiles: Vec<Tile> = layout.tiles().map(|(_, _, t)| t).collect();
            assert_eq!(
                tiles,
                vec![
                    Tile::Brick,
                    Tile::CrackedBrick,
                    Tile::Water,
                    Tile::Stone,
                    Tile::Tree,
                    Tile::MirrorPositive,
                    Tile::MirrorNegative,
                    Tile::Castle,
                    Tile::PlayerSpawn,
                    Tile::EnemySpawn,
                    Tile::Empty,
                    Tile::Empty,
                    Tile::Empty,
                ]
            );
        }

        #[test]
        fn only_first_player_anchor_counts() {
            let layout = LevelLayout::parse("..P\nP..");
            assert_eq!(layout.player_spawn(), Some((0, 2)));
            assert_eq!(layout.tile(1, 0), Some(Tile::Empty));
        }

        #[test]
        fn spawn_points_in_reading_order() {
            let layout = LevelLayout::parse("*.E\nE.*");
            assert_eq!(layout.enemy_spawns(), &[(0, 2), (1, 0)]);
            assert_eq!(layout.powerup_spawns(), &[(0, 0), (1, 2)]);
        }

        #[test]
        fn symbol_roundtrip() {
            for c in ['.', 'B', 'R', 'W', 'S', 'T', 'J', 'L', 'C', 'P', 'E'] {
                assert_eq!(Tile::from_symbol(c).symbol(), c);
            }
        }

        #[test]
        fn dimensions_are_checked() {
            let layout = LevelLayout::parse("...\n..");
            assert_eq!(
                layout.check_dimensions(2, 3),
                Err(LevelError::Dimensions {
                    expected_rows: 2,
                    expected_cols: 3,
                    rows: 2,
                    cols: 3,
                })
            );
            assert!(LevelLayout::parse("...\n...").check_dimensions(2, 3).is_ok());
        }
    }

    mod provider_tests {
        use super::*;

        #[test]
        fn builtin_has_four_full_size_stages() {
            let levels = BuiltinLevels::new();
            assert_eq!(levels.level_count(), 4);
            for index in 1..=4 {
                let layout = levels.layout(index).unwrap();
                layout.check_dimensions(32, 32).unwrap();
                assert!(layout.player_spawn().is_some());
                assert!(!layout.enemy_spawns().is_empty());
                assert!(!layout.powerup_spawns().is_empty());
            }
        }

        #[test]
        fn out_of_range_levels_are_unknown() {
            let levels = BuiltinLevels::new();
            assert_eq!(levels.layout(0), Err(LevelError::UnknownLevel(0)));
            assert_eq!(levels.layout(5), Err(LevelError::UnknownLevel(5)));
        }

        #[test]
        fn level_set_serves_its_maps() {
            let set = LevelSet::from_maps(["P.", "E."]);
            assert_eq!(set.level_count(), 2);
            assert_eq!(set.layout(2).unwrap().enemy_spawns(), &[(0, 0)]);
            assert!(set.layout(3).is_err());
        }
    }
}
