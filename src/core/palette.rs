use std::collections::HashMap;

/// RGB color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex string (#RRGGBB).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xFF]
    }
}

/// Course cell backgrounds, handed out in first-seen order.
pub const COURSE_PALETTE: [Rgb; 8] = [
    Rgb::new(0xFF, 0xD6, 0xD6),
    Rgb::new(0xD6, 0xEC, 0xFF),
    Rgb::new(0xD9, 0xF7, 0xD6),
    Rgb::new(0xFF, 0xF1, 0xC9),
    Rgb::new(0xE8, 0xDA, 0xFF),
    Rgb::new(0xFF, 0xE0, 0xF0),
    Rgb::new(0xD2, 0xF4, 0xF0),
    Rgb::new(0xFF, 0xE4, 0xCC),
];

/// Per-render color assignment. A new render gets a new assigner, so colors never
/// carry over from the previously loaded timetable.
#[derive(Debug, Default)]
pub struct ColorAssigner {
    assigned: HashMap<String, usize>,
}

impl ColorAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Palette index for `code`, assigning the next one if the code is new.
    pub fn index_for(&mut self, code: &str) -> usize {
        if let Some(&index) = self.assigned.get(code) {
            return index;
        }
        let index = self.assigned.len() % COURSE_PALETTE.len();
        self.assigned.insert(code.to_string(), index);
        index
    }

    pub fn color_for(&mut self, code: &str) -> Rgb {
        COURSE_PALETTE[self.index_for(code)]
    }
}
