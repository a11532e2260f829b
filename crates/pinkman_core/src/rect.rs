use glam::IVec2;

/// Integer axis-aligned rectangle in world pixels, y pointing down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn topleft(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn set_top(&mut self, top: i32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Resize in place, keeping the top-left corner.
    pub fn resize(&mut self, w: i32, h: i32) {
        self.w = w;
        self.h = h;
    }

    /// Half-open overlap test; touching edges do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_follow_position_and_size() {
        let rect = Rect::new(10, 20, 30, 40);
        assert_eq!(rect.left(), 10);
        assert_eq!(rect.right(), 40);
        assert_eq!(rect.top(), 20);
        assert_eq!(rect.bottom(), 60);
    }

    #[test]
    fn set_bottom_moves_top_edge() {
        let mut rect = Rect::new(0, 0, 16, 32);
        rect.set_bottom(100);
        assert_eq!(rect.y, 68);
        assert_eq!(rect.bottom(), 100);
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let ground = Rect::new(0, 100, 96, 96);
        let standing = Rect::new(10, 36, 64, 64);
        assert!(!standing.intersects(&ground));

        let sunk = Rect::new(10, 37, 64, 64);
        assert!(sunk.intersects(&ground));
    }

    #[test]
    fn resize_keeps_topleft() {
        let mut rect = Rect::new(5, 6, 10, 10);
        rect.resize(64, 32);
        assert_eq!(rect.topleft(), IVec2::new(5, 6));
        assert_eq!((rect.w, rect.h), (64, 32));
    }
}
