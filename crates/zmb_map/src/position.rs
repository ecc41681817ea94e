//! 网格布局
//!
//! 从左上角开始，从左到右、从上到下依次放置节点。网格用尽后回到 `(spacer, spacer)`
//! 继续放置 (与已有节点重叠)，不会报错。

/// 布局游标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    spacer: u32,
    canvas_width: u32,
    canvas_height: u32,
    x: u32,
    y: u32,
}

impl Position {
    /// 以左上角 `(spacer, spacer)` 为起点
    pub fn new(canvas_width: u32, canvas_height: u32, spacer: u32) -> Self {
        Self {
            spacer,
            canvas_width,
            canvas_height,
            x: spacer,
            y: spacer,
        }
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    /// 移动到下一个格子，返回是否回绕到了第一行第一格
    pub fn advance(&mut self) -> bool {
        if let Some(new_x) = Self::step(self.x, self.spacer, self.canvas_width) {
            self.x = new_x;
            return false;
        }

        self.x = self.spacer;
        match Self::step(self.y, self.spacer, self.canvas_height) {
            Some(new_y) => {
                self.y = new_y;
                false
            }
            None => {
                self.y = self.spacer;
                true
            }
        }
    }

    /// `value + spacer`，溢出或越界时为 `None`
    fn step(value: u32, spacer: u32, bound: u32) -> Option<u32> {
        value.checked_add(spacer).filter(|next| *next < bound)
    }

    /// 回绕前可放置的格子数
    pub fn capacity(&self) -> u32 {
        let columns = self.canvas_width.saturating_sub(1) / self.spacer.max(1);
        let rows = self.canvas_height.saturating_sub(1) / self.spacer.max(1);
        columns.max(1) * rows.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: u32 = 500;
    const HEIGHT: u32 = 500;
    const SPACER: u32 = 100;

    #[test]
    fn test_new_position() {
        let p = Position::new(WIDTH, HEIGHT, SPACER);
        assert_eq!((p.x(), p.y()), (SPACER, SPACER));
    }

    #[test]
    fn test_advance_moves_right() {
        let mut p = Position::new(WIDTH, HEIGHT, SPACER);
        assert!(!p.advance());
        assert_eq!((p.x(), p.y()), (SPACER * 2, SPACER));
    }

    #[test]
    fn test_advance_next_row() {
        let mut p = Position::new(WIDTH, HEIGHT, SPACER);
        for _ in 0..3 {
            p.advance();
        }
        assert_eq!((p.x(), p.y()), (400, 100));

        // 500 不小于宽度，换行
        assert!(!p.advance());
        assert_eq!((p.x(), p.y()), (100, 200));
    }

    #[test]
    fn test_advance_wraps_to_top() {
        let mut p = Position {
            spacer: SPACER,
            canvas_width: WIDTH,
            canvas_height: HEIGHT,
            x: WIDTH - 50,
            y: HEIGHT - 50,
        };
        assert!(p.advance());
        assert_eq!((p.x(), p.y()), (SPACER, SPACER));
    }

    #[test]
    fn test_sequence_is_periodic() {
        let (w, h, s) = (600, 400, 100);
        let mut p = Position::new(w, h, s);
        let period = ((w - s) / s) * ((h - s) / s);
        assert_eq!(p.capacity(), period);

        let mut first_cycle = Vec::new();
        for _ in 0..period {
            first_cycle.push((p.x(), p.y()));
            p.advance();
        }
        assert_eq!((p.x(), p.y()), (s, s));

        let mut second_cycle = Vec::new();
        for _ in 0..period {
            second_cycle.push((p.x(), p.y()));
            p.advance();
        }
        assert_eq!(first_cycle, second_cycle);

        // 一个周期内位置互不重复
        let mut dedup = first_cycle.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), period as usize);
    }

    #[test]
    fn test_advance_near_u32_max_wraps() {
        let mut p = Position::new(u32::MAX, u32::MAX, 3_000_000_000);
        assert_eq!(p.capacity(), 1);
        assert!(p.advance());
        assert_eq!((p.x(), p.y()), (3_000_000_000, 3_000_000_000));
    }

    #[test]
    fn test_only_last_cell_reports_wrap() {
        let mut p = Position::new(300, 300, 100);
        let wraps: Vec<bool> = (0..8).map(|_| p.advance()).collect();
        assert_eq!(wraps, vec![false, false, false, true, false, false, false, true]);
    }
}
