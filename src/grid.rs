//! Flat-arena grid of cells addressed by `(x, y)`.

/// Player spawn; also the origin of the reachability search.
pub const SPAWN: Pos = Pos { x: 1, y: 1 };

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: Pos) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedTier {
    Normal,
    Fast,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Collectible {
    pub symbol: char,
    pub stage: u32,
    /// Set while this collectible belongs to the stage that may be taken next.
    pub active: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
    Player,
    Pursuer {
        tier: SpeedTier,
        covered: Option<Collectible>,
    },
    Collectible(Collectible),
}

impl Cell {
    pub fn is_wall(&self) -> bool {
        matches!(self, Cell::Wall)
    }

    pub fn is_pursuer(&self) -> bool {
        matches!(self, Cell::Pursuer { .. })
    }

    /// The collectible stored in this cell, including one hidden under a pursuer.
    pub fn collectible(&self) -> Option<Collectible> {
        match *self {
            Cell::Collectible(c) => Some(c),
            Cell::Pursuer { covered, .. } => covered,
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// A grid with only the outer ring walled.
    pub fn bordered(size: usize) -> Self {
        let mut grid = Self::new(size);
        for i in 0..size {
            grid.set(Pos::new(i, 0), Cell::Wall);
            grid.set(Pos::new(i, size - 1), Cell::Wall);
            grid.set(Pos::new(0, i), Cell::Wall);
            grid.set(Pos::new(size - 1, i), Cell::Wall);
        }
        grid
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, pos: Pos) -> usize {
        pos.y * self.size + pos.x
    }

    pub fn get(&self, pos: Pos) -> Cell {
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Pos, cell: Cell) {
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.size && pos.y < self.size
    }

    pub fn is_interior(&self, pos: Pos) -> bool {
        pos.x > 0 && pos.y > 0 && pos.x < self.size - 1 && pos.y < self.size - 1
    }

    /// The in-bounds neighbor of `pos` in direction `dir`, if any.
    pub fn step(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let nx = pos.x as isize + dx;
        let ny = pos.y as isize + dy;
        if nx < 0 || ny < 0 {
            return None;
        }
        let next = Pos::new(nx as usize, ny as usize);
        self.contains(next).then_some(next)
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| Pos::new(x, y)))
    }

    pub fn cells(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        self.positions().map(move |p| (p, self.get(p)))
    }

    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_wall()).count()
    }
}
