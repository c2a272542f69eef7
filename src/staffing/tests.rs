mod properties;
mod utils;
