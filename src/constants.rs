// Reserved recipe keys
pub const RANDOMIZE_KEY: &str = "randomize";
pub const PLAYER_START: &str = "player_start";
pub const DEFAULT_BOARD_BUGS: &str = "default_board_bugs";
pub const NO_CHASE: &str = "no_chase";
pub const WEIGHTS_KEY: &str = "weights";

// Auxiliary configuration key suffixes (`v.choices`, `v.weights`)
pub const CHOICES_SUFFIX: &str = ".choices";
pub const WEIGHTS_SUFFIX: &str = ".weights";

// Generation protocol tags
pub const PROTOCOL_RANGE_PRODUCT: &str = "comb_list";
pub const PROTOCOL_RANGE_PAIR: &str = "zip_list";
pub const PROTOCOL_RECT_RANGE: &str = "rect_range";

// Generative variables with a candidate pipeline
pub const GENERATIVE_SUPPORT: [&str; 1] = [PLAYER_START];

// Upper bound on candidates a single protocol may produce
pub const MAX_PROTOCOL_CANDIDATES: usize = 65_536;

// Weight vectors must sum to 1 within this tolerance after normalisation
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

// Board glyphs for ASCII boards
pub const TILE_GLYPH: char = '.';
pub const WALL_GLYPH: char = '#';
