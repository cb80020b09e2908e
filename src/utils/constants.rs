/// Default input file names
pub const YEARLY_FILE: &str = "yearly_weather.csv";
pub const MONTHLY_FILE: &str = "monthly_weather.csv";
pub const SEASONAL_FILE: &str = "seasonal_weather.csv";
pub const ALL_CITIES_FILE: &str = "all_cities_weather.csv";

/// Directory names
pub const DEFAULT_DATA_DIR: &str = "data";

/// Column names
pub const CITY_COLUMN: &str = "city";
pub const YEAR_COLUMN: &str = "year";
pub const MONTH_COLUMN: &str = "month";
pub const SEASON_COLUMN: &str = "season";
pub const TIME_COLUMN: &str = "time";

/// Historical coverage of the datasets
pub const YEAR_MIN: i32 = 2015;
pub const YEAR_MAX: i32 = 2024;

/// Timestamp layouts accepted for the time column, tried in order
pub const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d"];

/// Tokens read as a missing measurement
pub const MISSING_VALUE_TOKENS: &[&str] = &["", "nan", "NaN", "NA", "null"];

/// Configuration
pub const ENV_PREFIX: &str = "WEATHER_TRENDS";
pub const ENV_SEPARATOR: &str = "__";

/// Output formats
pub const FORMAT_TEXT: &str = "text";
pub const FORMAT_JSON: &str = "json";
