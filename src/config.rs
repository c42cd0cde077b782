/// Color representation for meter elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const RED: Color = Color::new(0xff, 0x00, 0x0c);
    pub const BLUE: Color = Color::new(0x00, 0x52, 0x9f);
    pub const GREEN: Color = Color::new(0x6f, 0xe0, 0x5c);
    pub const ORANGE: Color = Color::new(0xff, 0x79, 0x1e);
    pub const GRAY: Color = Color::new(0x65, 0x65, 0x65);
    pub const DARK: Color = Color::new(0x3a, 0x3a, 0x3a);
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    /// What a freshly allocated canvas holds
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Opaque color
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn as_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Nominal drawing area, before padding
pub const METER_WIDTH: u32 = 133;
pub const METER_HEIGHT: u32 = 54;

pub const BAR_WIDTH: i32 = 8;
pub const BAR_GAP: i32 = 1;
pub const ZONE_GAP: i32 = 5;
/// Row the zone bars stand on
pub const BAR_BASELINE: i32 = 37;

pub const RULE_HEIGHT: i32 = 13;
/// Baseline of the boundary labels
pub const RULE_LABEL_Y: i32 = 3 + 8;
pub const MIN_LABEL_INSET: i32 = 12;
pub const MAX_LABEL_INSET: i32 = 5;

pub const MARKER_TOP: i32 = 17;
pub const MARKER_WIDTH: i32 = 2;
pub const MARKER_HEIGHT: i32 = 34;
pub const MARKER_LABEL_GAP: i32 = 5;

/// One of the three horizontal zones of the scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    pub bars: i32,
    /// Height of the first bar; each following bar is one pixel taller
    pub base_height: i32,
    pub color: Color,
}

impl Zone {
    pub const fn width(&self) -> i32 {
        BAR_WIDTH * self.bars + BAR_GAP * (self.bars - 1)
    }
}

pub const UNDER_RANGE: Zone = Zone {
    bars: 5,
    base_height: 3,
    color: Color::BLUE,
};

pub const IN_RANGE: Zone = Zone {
    bars: 4,
    base_height: 8,
    color: Color::GREEN,
};

pub const OVER_RANGE: Zone = Zone {
    bars: 5,
    base_height: 12,
    color: Color::RED,
};

pub const ZONES: [Zone; 3] = [UNDER_RANGE, IN_RANGE, OVER_RANGE];

pub const UNDER_RANGE_START: i32 = 0;
pub const IN_RANGE_START: i32 = UNDER_RANGE_START + UNDER_RANGE.width() + ZONE_GAP;
pub const OVER_RANGE_START: i32 = IN_RANGE_START + IN_RANGE.width() + ZONE_GAP;

pub const ZONE_STARTS: [i32; 3] = [UNDER_RANGE_START, IN_RANGE_START, OVER_RANGE_START];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_widths_and_offsets() {
        assert_eq!(UNDER_RANGE.width(), 44);
        assert_eq!(IN_RANGE.width(), 35);
        assert_eq!(OVER_RANGE.width(), 44);
        assert_eq!(ZONE_STARTS, [0, 49, 89]);
        assert_eq!(OVER_RANGE_START + OVER_RANGE.width(), METER_WIDTH as i32);
    }
}
