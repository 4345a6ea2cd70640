//! Test fixtures for delivery-planner.
//!
//! Provides an ASCII stage-grid parser and a builder for test items, so
//! tests can draw their scenario instead of hand-writing wall tables.

use delivery_planner::traits::{Cell, Field, Item};

/// Grid built from ASCII art: `#` wall, `.` free, `@` depot.
pub struct AsciiField {
    width: usize,
    height: usize,
    walls: Vec<bool>,
    depot: Cell,
}

impl AsciiField {
    pub fn parse(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows[0].len();
        let mut walls = vec![false; width * height];
        let mut depot = None;
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), width, "ragged fixture grid");
            for (x, ch) in row.chars().enumerate() {
                match ch {
                    '#' => walls[y * width + x] = true,
                    '.' => {}
                    '@' => depot = Some(Cell::new(x, y)),
                    other => panic!("unexpected fixture cell {other:?}"),
                }
            }
        }
        Self {
            width,
            height,
            walls,
            depot: depot.expect("fixture grid has no depot"),
        }
    }
}

impl Field for AsciiField {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn is_wall(&self, x: usize, y: usize) -> bool {
        self.walls[y * self.width + x]
    }

    fn depot(&self) -> Cell {
        self.depot
    }
}

/// Builder for test items with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestItem {
    destination: Cell,
    weight: i32,
    fixed_period: Option<usize>,
}

impl TestItem {
    pub fn at(x: usize, y: usize) -> Self {
        Self {
            destination: Cell::new(x, y),
            weight: 1,
            fixed_period: None,
        }
    }

    pub fn weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn period(mut self, period: usize) -> Self {
        self.fixed_period = Some(period);
        self
    }
}

impl Item for TestItem {
    fn destination(&self) -> Cell {
        self.destination
    }

    fn weight(&self) -> i32 {
        self.weight
    }

    fn fixed_period(&self) -> Option<usize> {
        self.fixed_period
    }
}
