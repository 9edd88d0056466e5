//! World geometry: wall segments and the obstacles built from them.
//!
//! Collision is a bounding-box test. A segment occupies the axis-aligned
//! rectangle spanned by its endpoints, so a diagonal wall behaves like a solid
//! rectangle. Rays rely on this; do not replace it with a true
//! point-to-segment distance.

/// RGB display color.
pub type Color = [u8; 3];

pub const WHITE: Color = [255, 255, 255];

/// Collision margin used by the ray marcher.
pub const RAY_MARGIN: [f32; 2] = [1.0, 1.0];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: [f32; 2], // (x, y) in world space
    pub end: [f32; 2],
    pub color: Color,
}

impl Segment {
    pub fn new(start: [f32; 2], end: [f32; 2]) -> Self {
        Self {
            start,
            end,
            color: WHITE,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// `(min, max)` corners of the bounding rectangle.
    #[inline]
    pub fn bounds(&self) -> ([f32; 2], [f32; 2]) {
        (
            [
                self.start[0].min(self.end[0]),
                self.start[1].min(self.end[1]),
            ],
            [
                self.start[0].max(self.end[0]),
                self.start[1].max(self.end[1]),
            ],
        )
    }

    /// True iff `point` lies strictly inside the bounding rectangle grown by
    /// `margin` on each axis.
    #[inline]
    pub fn collides(&self, point: [f32; 2], margin: [f32; 2]) -> bool {
        let (lo, hi) = self.bounds();
        lo[0] - margin[0] < point[0]
            && point[0] < hi[0] + margin[0]
            && lo[1] - margin[1] < point[1]
            && point[1] < hi[1] + margin[1]
    }
}

/// Sides of a hollow block that are left out.
///
/// Side order is top, left, right, bottom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SideMask(u8);

impl SideMask {
    pub const NONE: SideMask = SideMask(0);
    pub const TOP: SideMask = SideMask(1);
    pub const LEFT: SideMask = SideMask(1 << 1);
    pub const RIGHT: SideMask = SideMask(1 << 2);
    pub const BOTTOM: SideMask = SideMask(1 << 3);

    /// Builds a mask from per-side flags, `true` meaning omitted.
    pub fn from_flags(flags: [bool; 4]) -> Self {
        let bits = flags
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, &off)| if off { acc | (1 << i) } else { acc });
        SideMask(bits)
    }

    #[inline]
    pub fn omits(self, side: usize) -> bool {
        self.0 & (1 << side) != 0
    }
}

impl std::ops::BitOr for SideMask {
    type Output = SideMask;

    fn bitor(self, rhs: SideMask) -> SideMask {
        SideMask(self.0 | rhs.0)
    }
}

/// A hollow rectangle made of up to four wall segments.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeObstacle {
    pub sides: Vec<Segment>,
}

impl CompositeObstacle {
    /// Outline of the `size[0]` x `size[1]` rectangle at `origin`. The right
    /// side sits at `x + w` and the top and bottom sides span `w`; the height
    /// only sets the vertical extent, so non-square blocks close properly.
    pub fn hollow_block(origin: [f32; 2], size: [f32; 2], color: Color, omitted: SideMask) -> Self {
        let [x, y] = origin;
        let [w, h] = size;
        let all = [
            Segment::new([x, y], [x + w, y]),         // top
            Segment::new([x, y], [x, y + h]),         // left
            Segment::new([x + w, y], [x + w, y + h]), // right
            Segment::new([x, y + h], [x + w, y + h]), // bottom
        ];
        let sides = all
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !omitted.omits(*i))
            .map(|(_, s)| s.with_color(color))
            .collect();
        Self { sides }
    }

    pub fn collides(&self, point: [f32; 2], margin: [f32; 2]) -> bool {
        self.sides.iter().any(|s| s.collides(point, margin))
    }
}

/// Anything a ray can stop on.
#[derive(Clone, Debug, PartialEq)]
pub enum Obstacle {
    /// A single wall segment.
    Wall(Segment),
    /// A filled rectangle, stored as its diagonal.
    Block(Segment),
    /// A rectangle outline with optional missing sides.
    Hollow(CompositeObstacle),
}

impl Obstacle {
    pub fn wall(start: [f32; 2], end: [f32; 2]) -> Self {
        Obstacle::Wall(Segment::new(start, end))
    }

    pub fn block(origin: [f32; 2], size: [f32; 2]) -> Self {
        let end = [origin[0] + size[0], origin[1] + size[1]];
        Obstacle::Block(Segment::new(origin, end))
    }

    pub fn hollow(origin: [f32; 2], size: [f32; 2], omitted: SideMask) -> Self {
        Obstacle::Hollow(CompositeObstacle::hollow_block(origin, size, WHITE, omitted))
    }

    #[inline]
    pub fn collides(&self, point: [f32; 2], margin: [f32; 2]) -> bool {
        match self {
            Obstacle::Wall(s) | Obstacle::Block(s) => s.collides(point, margin),
            Obstacle::Hollow(c) => c.collides(point, margin),
        }
    }

    /// Member segments, for drawing outlines.
    pub fn segments(&self) -> &[Segment] {
        match self {
            Obstacle::Wall(s) | Obstacle::Block(s) => std::slice::from_ref(s),
            Obstacle::Hollow(c) => &c.sides,
        }
    }

    pub fn color(&self) -> Color {
        self.segments().first().map_or(WHITE, |s| s.color)
    }

    pub fn with_color(self, color: Color) -> Self {
        match self {
            Obstacle::Wall(s) => Obstacle::Wall(s.with_color(color)),
            Obstacle::Block(s) => Obstacle::Block(s.with_color(color)),
            Obstacle::Hollow(mut c) => {
                for s in &mut c.sides {
                    s.color = color;
                }
                Obstacle::Hollow(c)
            }
        }
    }
}
