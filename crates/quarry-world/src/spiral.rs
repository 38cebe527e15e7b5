use crate::coord::ChunkPos;

/// Walks chunk positions in rings of growing Manhattan distance around a
/// centre. Ring `r` starts at `(cx + r, cz)` and visits `(cx, cz + r)`,
/// `(cx - r, cz)`, `(cx, cz - r)` in that order, `4r` positions per ring.
///
/// Yields `(radius, pos)` and never ends; bound it with `take_while`.
#[derive(Clone, Debug)]
pub struct ManhattanSpiral {
    center: ChunkPos,
    cur: ChunkPos,
    step: (i32, i32),
    steps: u32,
    radius: u32,
    started: bool,
}

impl ManhattanSpiral {
    pub fn new(center: ChunkPos) -> Self {
        Self {
            center,
            cur: center,
            step: (1, 1),
            steps: 0,
            radius: 0,
            started: false,
        }
    }

    #[inline]
    pub fn center(&self) -> ChunkPos {
        self.center
    }

    /// Ring of the position most recently yielded.
    #[inline]
    pub fn radius(&self) -> u32 {
        self.radius
    }

    fn advance(&mut self) {
        if self.steps == 4 * self.radius {
            self.radius += 1;
            self.cur = self.center.offset(self.radius as i32, 0);
            self.step = (1, 1);
            self.steps = 1;
        } else {
            if self.cur.x == self.center.x {
                self.step.1 = -self.step.1;
            } else if self.cur.z == self.center.z {
                self.step.0 = -self.step.0;
            }
            self.cur = self.cur.offset(self.step.0, self.step.1);
            self.steps += 1;
        }
    }

    /// Positions of rings `0..=max_radius`, in visiting order.
    pub fn within(center: ChunkPos, max_radius: u32) -> impl Iterator<Item = ChunkPos> {
        Self::new(center)
            .take_while(move |&(r, _)| r <= max_radius)
            .map(|(_, p)| p)
    }
}

impl Iterator for ManhattanSpiral {
    type Item = (u32, ChunkPos);

    fn next(&mut self) -> Option<Self::Item> {
        if self.started {
            self.advance();
        } else {
            self.started = true;
        }
        Some((self.radius, self.cur))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_two_rings_in_order() {
        let got: Vec<(i32, i32)> = ManhattanSpiral::within(ChunkPos::new(0, 0), 2)
            .map(|p| (p.x, p.z))
            .collect();
        assert_eq!(
            got,
            vec![
                (0, 0),
                (1, 0),
                (0, 1),
                (-1, 0),
                (0, -1),
                (2, 0),
                (1, 1),
                (0, 2),
                (-1, 1),
                (-2, 0),
                (-1, -1),
                (0, -2),
                (1, -1),
            ]
        );
    }

    #[test]
    fn restarting_repeats_the_sequence() {
        let c = ChunkPos::new(-7, 12);
        let a: Vec<_> = ManhattanSpiral::new(c).take(50).collect();
        let b: Vec<_> = ManhattanSpiral::new(c).take(50).collect();
        assert_eq!(a, b);
    }
}
