// Category colouring for pie charts
use xxhash_rust::xxh32::xxh32;

const DEFAULT_COLORS: [&str; 10] = [
    "#2caffe", "#544fc5", "#00e272", "#fe6a35", "#6b8abc", "#d568fb", "#2ee0ca", "#fa4b42",
    "#feb56a", "#91e8e1",
];

/// Assigns a stable colour to a category name.
pub trait ColorAssigner: Send + Sync {
    fn color_for(&self, category: &str) -> String;
}

/// Picks from a fixed palette by hashing the category name.
#[derive(Debug, Clone)]
pub struct HashPalette {
    colors: Vec<String>,
}

impl HashPalette {
    pub fn new(colors: Vec<String>) -> Self {
        Self { colors }
    }
}

impl Default for HashPalette {
    fn default() -> Self {
        Self::new(DEFAULT_COLORS.iter().map(|c| c.to_string()).collect())
    }
}

impl ColorAssigner for HashPalette {
    fn color_for(&self, category: &str) -> String {
        if self.colors.is_empty() {
            return DEFAULT_COLORS[0].to_string();
        }
        let index = xxh32(category.as_bytes(), 0) as usize % self.colors.len();
        self.colors[index].clone()
    }
}

/// Shift every channel of a `#rrggbb` colour by `amount * 255`, clamped.
pub fn brighten(hex: &str, amount: f64) -> Option<String> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }

    let shift = (amount * 255.0) as i32;
    let mut out = String::from("#");
    for i in 0..3 {
        let channel = u8::from_str_radix(digits.get(i * 2..i * 2 + 2)?, 16).ok()? as i32;
        out.push_str(&format!("{:02x}", (channel + shift).clamp(0, 255)));
    }
    Some(out)
}
