use ndarray::Array2;

/// Zero-based grid position `(x, y)`.
pub type Coords = (usize, usize);

/// Board dimensions `(width, height)`.
pub type Size = (usize, usize);

const OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Iterates the in-bounds 8-directional neighbors of `center`.
///
/// Yields between 3 (corner) and 8 (interior) positions, or none on a 1x1
/// board. The iterator borrows nothing, so it can run while the caller
/// mutates the grid it came from.
pub fn neighbors(center: Coords, bounds: Size) -> impl Iterator<Item = Coords> {
    OFFSETS.into_iter().filter_map(move |(dx, dy)| {
        let x = center.0.checked_add_signed(dx)?;
        let y = center.1.checked_add_signed(dy)?;
        (x < bounds.0 && y < bounds.1).then_some((x, y))
    })
}

pub trait GridNeighbors {
    fn iter_neighbors(&self, center: Coords) -> impl Iterator<Item = Coords>;
}

impl<T> GridNeighbors for Array2<T> {
    fn iter_neighbors(&self, center: Coords) -> impl Iterator<Item = Coords> {
        neighbors(center, self.dim())
    }
}
