/// Single coordinate axis used for board width, height, and positions.
/// The server caps boards at 50x50, so a byte is plenty.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional board position `(row, col)`, matching the wire format's
/// row-major board layout.
pub type Coord2 = (Coord, Coord);

/// Monotonically increasing stamp on dispatched requests, used to discard
/// responses that arrive after a newer one was already applied.
pub type IntentSeq = u64;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}
