use tui::style::Color;

/// Colors for one theme mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub border: Color,
    pub error: Color,
    pub success: Color,
    pub warning: Color,
}

const LIGHT: Palette = Palette {
    primary: Color::Rgb(0xE5, 0x3E, 0x3E),
    background: Color::Rgb(0xFF, 0xFF, 0xFF),
    surface: Color::Rgb(0xF5, 0xF5, 0xF5),
    text: Color::Rgb(0x00, 0x00, 0x00),
    text_secondary: Color::Rgb(0x66, 0x66, 0x66),
    border: Color::Rgb(0xE1, 0xE1, 0xE1),
    error: Color::Rgb(0xE5, 0x3E, 0x3E),
    success: Color::Rgb(0x4C, 0xAF, 0x50),
    warning: Color::Rgb(0xFF, 0x98, 0x00),
};

const DARK: Palette = Palette {
    background: Color::Rgb(0x1A, 0x1A, 0x1A),
    surface: Color::Rgb(0x33, 0x33, 0x33),
    text: Color::Rgb(0xFF, 0xFF, 0xFF),
    text_secondary: Color::Rgb(0xA0, 0xA0, 0xA0),
    border: Color::Rgb(0x33, 0x33, 0x33),
    ..LIGHT
};

impl Palette {
    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode { DARK } else { LIGHT }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_share_accent_but_not_background() {
        let light = Palette::for_mode(false);
        let dark = Palette::for_mode(true);
        assert_eq!(light.primary, dark.primary);
        assert_ne!(light.background, dark.background);
        assert_ne!(light.text, dark.text);
    }
}
