/// the palette used when none is configured.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#FF5733", "#33FF57", "#3357FF", "#F333FF", "#FF33F3", "#33FFF5", "#FF8C33", "#8C33FF",
    "#33FF8C", "#FF338C",
];

/// fixed list of color tokens handed out round-robin by feature index.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorPalette {
    colors: Vec<String>,
}

impl Default for ColorPalette {
    fn default() -> Self {
        ColorPalette {
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl ColorPalette {
    pub fn new(colors: Vec<String>) -> Result<ColorPalette, String> {
        if colors.is_empty() {
            return Err(String::from("color palette must contain at least one color"));
        }
        Ok(ColorPalette { colors })
    }

    pub fn color_for_index(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
