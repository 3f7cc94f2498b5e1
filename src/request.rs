use crate::{colours, Colour, PlaceholderError, Pt};

pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_HEIGHT: u32 = 300;
pub const DEFAULT_TEXT: &str = "Placeholder";

/// Everything needed to render one placeholder image
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub width: u32,
    pub height: u32,
    pub text: String,
    /// `None` lets the fit calculator choose a size
    pub font_size: Option<Pt>,
    pub background: Colour,
    pub font_colour: Colour,
}

impl Default for RenderRequest {
    fn default() -> Self {
        RenderRequest {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            text: DEFAULT_TEXT.to_string(),
            font_size: None,
            background: colours::WHITE,
            font_colour: colours::BLACK,
        }
    }
}

/// Query parameter names, canonical name first
const WIDTH: &[&str] = &["width", "w"];
const HEIGHT: &[&str] = &["height", "h"];
const TEXT: &[&str] = &["text", "t"];
const FONT_SIZE: &[&str] = &["font_size", "fs"];
const BG_COLOR: &[&str] = &["bg_color", "bg"];
const FONT_COLOR: &[&str] = &["font_color", "fc"];

/// Canonical names and aliases of every accepted query parameter
pub const QUERY_PARAMETERS: [&[&str]; 6] = [WIDTH, HEIGHT, TEXT, FONT_SIZE, BG_COLOR, FONT_COLOR];

impl RenderRequest {
    /// Build a request from a URL query string (without the leading `?`).
    /// Missing or empty parameters keep their defaults; when a parameter is
    /// given more than once, the last value wins. Colours are parsed here so
    /// bad input is rejected before any rendering happens.
    pub fn from_query(query: &str) -> Result<RenderRequest, PlaceholderError> {
        let mut request = RenderRequest::default();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            let key = key.as_ref();
            let value = value.as_ref();

            if WIDTH.contains(&key) {
                request.width = parse_dimension(WIDTH[0], value)?;
            } else if HEIGHT.contains(&key) {
                request.height = parse_dimension(HEIGHT[0], value)?;
            } else if TEXT.contains(&key) {
                request.text = value.to_string();
            } else if FONT_SIZE.contains(&key) {
                request.font_size = parse_font_size(value)?;
            } else if BG_COLOR.contains(&key) {
                request.background = Colour::parse(value)?;
            } else if FONT_COLOR.contains(&key) {
                request.font_colour = Colour::parse(value)?;
            }
        }

        Ok(request)
    }
}

fn invalid(name: &'static str, value: &str) -> PlaceholderError {
    PlaceholderError::InvalidParameter {
        name,
        value: value.to_string(),
    }
}

fn parse_dimension(name: &'static str, value: &str) -> Result<u32, PlaceholderError> {
    value.trim().parse().map_err(|_| invalid(name, value))
}

/// Zero means "pick a size for me"
fn parse_font_size(value: &str) -> Result<Option<Pt>, PlaceholderError> {
    let size: f32 = value
        .trim()
        .parse()
        .map_err(|_| invalid(FONT_SIZE[0], value))?;
    if !size.is_finite() || size < 0.0 {
        return Err(invalid(FONT_SIZE[0], value));
    }
    Ok((size > 0.0).then_some(Pt(size)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_gives_defaults() {
        let request = RenderRequest::from_query("").unwrap();
        assert_eq!(request, RenderRequest::default());
        assert_eq!(request.width, 400);
        assert_eq!(request.height, 300);
        assert_eq!(request.text, "Placeholder");
        assert_eq!(request.font_size, None);
    }

    #[test]
    fn reads_every_parameter() {
        let request = RenderRequest::from_query(
            "width=600&height=400&text=Hello%20World&font_size=36&bg_color=%23FF5733&font_color=%23FFFFFF",
        )
        .unwrap();
        assert_eq!(request.width, 600);
        assert_eq!(request.height, 400);
        assert_eq!(request.text, "Hello World");
        assert_eq!(request.font_size, Some(Pt(36.0)));
        assert_eq!(request.background, Colour::new_rgb_bytes(0xFF, 0x57, 0x33));
        assert_eq!(request.font_colour, colours::WHITE);
    }

    #[test]
    fn accepts_short_aliases() {
        let request =
            RenderRequest::from_query("w=10&h=20&t=x+y&fs=12.5&bg=rgb(1,2,3)&fc=%23000000ff")
                .unwrap();
        assert_eq!((request.width, request.height), (10, 20));
        assert_eq!(request.text, "x y");
        assert_eq!(request.font_size, Some(Pt(12.5)));
        assert_eq!(request.background, Colour::new_rgb_bytes(1, 2, 3));
        assert_eq!(request.font_colour, colours::BLACK);
    }

    #[test]
    fn last_occurrence_wins() {
        let request = RenderRequest::from_query("width=10&w=20").unwrap();
        assert_eq!(request.width, 20);
    }

    #[test]
    fn zero_font_size_means_auto() {
        let request = RenderRequest::from_query("font_size=0").unwrap();
        assert_eq!(request.font_size, None);
    }

    #[test]
    fn empty_values_keep_defaults() {
        let request = RenderRequest::from_query("text=&width=").unwrap();
        assert_eq!(request.text, DEFAULT_TEXT);
        assert_eq!(request.width, DEFAULT_WIDTH);
    }

    #[test]
    fn rejects_bad_numbers() {
        for query in ["width=abc", "height=-5", "font_size=-1", "font_size=NaN", "fs=inf"] {
            assert!(
                matches!(
                    RenderRequest::from_query(query),
                    Err(PlaceholderError::InvalidParameter { .. })
                ),
                "{query} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_bad_colours() {
        assert!(matches!(
            RenderRequest::from_query("bg_color=notacolor"),
            Err(PlaceholderError::InvalidColour(_))
        ));
    }

    #[test]
    fn ignores_unknown_parameters() {
        assert!(RenderRequest::from_query("format=jpeg&x=1").is_ok());
    }
}
