//! Arena grid and cell model
//!
//! The grid is a flat row-major matrix of [`Cell`] values. Queries outside the
//! grid return `None` and writes outside the grid are ignored.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::level::LevelLayout;
use crate::consts::MAX_PLAYERS;
use crate::error::SimError;

/// State of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    /// Border and lattice walls, never destroyed
    Indestructible,
    /// Breakable wall, stops a blast ray and may drop a bonus
    Destructible,
    /// A live bomb sits here
    Bomb,
    /// Transient blast marker
    Explosion,
}

impl Cell {
    /// Decode a level layout value (0 = empty, 1 = indestructible, 2 = destructible)
    pub fn from_layout(value: u8) -> Option<Self> {
        match value {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Indestructible),
            2 => Some(Cell::Destructible),
            _ => None,
        }
    }

    /// Single-character form used by text snapshots
    pub fn glyph(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Indestructible => '#',
            Cell::Destructible => '%',
            Cell::Bomb => 'o',
            Cell::Explosion => '*',
        }
    }
}

/// Orthogonal movement / blast direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions in a fixed order (keeps RNG draws reproducible)
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step in grid coordinates (y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    /// Direction matching a unit delta, if any
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Start corners in roster order: top-left, bottom-right, top-right, bottom-left
pub fn spawn_points(width: i32, height: i32) -> [IVec2; MAX_PLAYERS] {
    [
        IVec2::new(1, 1),
        IVec2::new(width - 2, height - 2),
        IVec2::new(width - 2, 1),
        IVec2::new(1, height - 2),
    ]
}

/// Fixed-size cell matrix for one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an all-empty grid
    pub fn new(width: i32, height: i32) -> Result<Self, SimError> {
        let area = match width.checked_mul(height) {
            Some(area) if width > 0 && height > 0 => area,
            _ => return Err(SimError::InvalidDimensions { width, height }),
        };
        Ok(Self {
            width,
            height,
            cells: vec![Cell::Empty; area as usize],
        })
    }

    /// Generate a random arena: border ring and even-coordinate lattice are
    /// indestructible, other interior cells are destructible with probability
    /// `wall_density`, and every spawn zone is cleared afterwards.
    pub fn generate<R: Rng + ?Sized>(
        width: i32,
        height: i32,
        spawns: &[IVec2],
        wall_density: f64,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        let mut grid = Self::new(width, height)?;
        let density = wall_density.clamp(0.0, 1.0);

        for y in 0..height {
            for x in 0..width {
                let pos = IVec2::new(x, y);
                let cell = if grid.is_border(pos) || (x % 2 == 0 && y % 2 == 0) {
                    Cell::Indestructible
                } else if rng.random_bool(density) {
                    Cell::Destructible
                } else {
                    Cell::Empty
                };
                grid.set(pos, cell);
            }
        }

        for &spawn in spawns {
            grid.clear_spawn_zone(spawn);
        }

        log::debug!(
            "Generated {}x{} grid: {} destructible walls",
            width,
            height,
            grid.count(Cell::Destructible)
        );
        Ok(grid)
    }

    /// Build a grid verbatim from a level layout (no randomness, no spawn clearing)
    pub fn from_layout(layout: &LevelLayout) -> Self {
        let cells = layout
            .rows()
            .iter()
            .flat_map(|row| row.iter().map(|&v| Cell::from_layout(v).unwrap_or_default()))
            .collect();
        Self {
            width: layout.width() as i32,
            height: layout.height() as i32,
            cells,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn is_in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: IVec2) -> Option<usize> {
        self.is_in_bounds(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    fn is_border(&self, pos: IVec2) -> bool {
        pos.x == 0 || pos.y == 0 || pos.x == self.width - 1 || pos.y == self.height - 1
    }

    /// Cell at `pos`, or `None` outside the grid
    pub fn get(&self, pos: IVec2) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Overwrite the cell at `pos`; ignored outside the grid
    pub fn set(&mut self, pos: IVec2, cell: Cell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    /// True if `pos` is inside the grid and currently empty
    pub fn is_empty(&self, pos: IVec2) -> bool {
        self.get(pos) == Some(Cell::Empty)
    }

    /// Number of cells of the given type
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Rows of cells, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Force a spawn position and its 8-neighbourhood to empty. The border ring
    /// stays intact.
    fn clear_spawn_zone(&mut self, spawn: IVec2) {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let pos = spawn + IVec2::new(dx, dy);
                if self.is_in_bounds(pos) && !self.is_border(pos) {
                    self.set(pos, Cell::Empty);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_new_rejects_non_positive_dimensions() {
        assert_eq!(
            Grid::new(0, 5),
            Err(SimError::InvalidDimensions {
                width: 0,
                height: 5
            })
        );
        assert!(Grid::new(4, -1).is_err());
        assert!(Grid::new(1, 1).is_ok());
    }

    #[test]
    fn test_new_rejects_overflowing_area() {
        assert_eq!(
            Grid::new(70_000, 70_000),
            Err(SimError::InvalidDimensions {
                width: 70_000,
                height: 70_000
            })
        );
        assert!(Grid::new(i32::MAX, 2).is_err());
    }

    #[test]
    fn test_generate_border_and_lattice() {
        let mut rng = Pcg32::seed_from_u64(7);
        let grid = Grid::generate(15, 13, &spawn_points(15, 13), 0.3, &mut rng).unwrap();

        for x in 0..15 {
            assert_eq!(grid.get(IVec2::new(x, 0)), Some(Cell::Indestructible));
            assert_eq!(grid.get(IVec2::new(x, 12)), Some(Cell::Indestructible));
        }
        for y in 0..13 {
            assert_eq!(grid.get(IVec2::new(0, y)), Some(Cell::Indestructible));
            assert_eq!(grid.get(IVec2::new(14, y)), Some(Cell::Indestructible));
        }
        // Lattice away from spawn zones
        assert_eq!(grid.get(IVec2::new(6, 6)), Some(Cell::Indestructible));
        assert_eq!(grid.get(IVec2::new(4, 8)), Some(Cell::Indestructible));
        // Odd interior cells never become indestructible
        assert_ne!(grid.get(IVec2::new(5, 5)), Some(Cell::Indestructible));
    }

    #[test]
    fn test_generate_clears_spawn_zones() {
        let mut rng = Pcg32::seed_from_u64(99);
        let spawns = spawn_points(11, 11);
        // Full density so every open cell would otherwise be a wall
        let grid = Grid::generate(11, 11, &spawns, 1.0, &mut rng).unwrap();

        for spawn in spawns {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let pos = spawn + IVec2::new(dx, dy);
                    if grid.is_border(pos) {
                        assert_eq!(grid.get(pos), Some(Cell::Indestructible));
                    } else {
                        assert_eq!(grid.get(pos), Some(Cell::Empty), "{pos:?} not cleared");
                    }
                }
            }
        }
        assert_eq!(grid.get(IVec2::new(5, 5)), Some(Cell::Destructible));
    }

    #[test]
    fn test_generate_is_seed_deterministic() {
        let spawns = spawn_points(13, 11);
        let a = Grid::generate(13, 11, &spawns, 0.3, &mut Pcg32::seed_from_u64(42)).unwrap();
        let b = Grid::generate(13, 11, &spawns, 0.3, &mut Pcg32::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_layout_is_verbatim() {
        let layout = LevelLayout::from_rows(vec![
            vec![1, 1, 1, 1],
            vec![1, 2, 0, 1],
            vec![1, 1, 1, 1],
        ])
        .unwrap();
        let grid = Grid::from_layout(&layout);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.get(IVec2::new(1, 1)), Some(Cell::Destructible));
        assert_eq!(grid.get(IVec2::new(2, 1)), Some(Cell::Empty));
        assert_eq!(grid.count(Cell::Indestructible), 10);
    }

    #[test]
    fn test_direction_delta_round_trip() {
        for dir in Direction::ALL {
            let d = dir.delta();
            assert_eq!(Direction::from_delta(d.x, d.y), Some(dir));
        }
        assert_eq!(Direction::from_delta(1, 1), None);
    }

    proptest! {
        #[test]
        fn prop_out_of_bounds_is_inert(x in -50i32..50, y in -50i32..50) {
            let mut grid = Grid::new(7, 5).unwrap();
            let before = grid.clone();
            let pos = IVec2::new(x, y);
            grid.set(pos, Cell::Bomb);
            if grid.is_in_bounds(pos) {
                prop_assert_eq!(grid.get(pos), Some(Cell::Bomb));
            } else {
                prop_assert_eq!(grid.get(pos), None);
                prop_assert_eq!(grid, before);
            }
        }
    }
}
