/// Horizontal drag distance a swipe has to exceed to change page
pub const SWIPE_THRESHOLD: i32 = 50;

/// Which way a page change went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Back,
}

/// Current page plus the in-flight swipe, owned by the top-level app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    total: usize,
    touch_start_x: Option<i32>,
}

impl Navigator {
    pub fn new(total: usize) -> Self {
        Navigator {
            current: 0,
            total: total.max(1),
            touch_start_x: None,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Move one page forward, stopping at the last page.
    /// Returns whether the index changed.
    pub fn next(&mut self) -> bool {
        let target = (self.current + 1).min(self.total - 1);
        self.move_to(target)
    }

    /// Move one page back, stopping at the first page.
    pub fn prev(&mut self) -> bool {
        let target = self.current.saturating_sub(1);
        self.move_to(target)
    }

    pub fn step(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.next(),
            Direction::Back => self.prev(),
        }
    }

    fn move_to(&mut self, target: usize) -> bool {
        let changed = target != self.current;
        self.current = target;
        changed
    }

    /// Start of a swipe gesture
    pub fn touch_down(&mut self, x: i32) {
        self.touch_start_x = Some(x);
    }

    /// End of a swipe gesture. A release without a recorded start is ignored.
    pub fn touch_up(&mut self, x: i32) -> bool {
        match self.touch_start_x.take() {
            Some(start) => self.swipe(x - start),
            None => false,
        }
    }

    /// Apply a horizontal swipe: dragging left goes forward, right goes back.
    pub fn swipe(&mut self, dx: i32) -> bool {
        match swipe_direction(dx) {
            Some(direction) => self.step(direction),
            None => false,
        }
    }

    /// One flag per page, set at the current page
    pub fn indicator(&self) -> Vec<bool> {
        (0..self.total).map(|i| i == self.current).collect()
    }
}

/// Direction for a swipe displacement, or None below the threshold
pub fn swipe_direction(dx: i32) -> Option<Direction> {
    if dx.abs() <= SWIPE_THRESHOLD {
        None
    } else if dx < 0 {
        Some(Direction::Forward)
    } else {
        Some(Direction::Back)
    }
}
