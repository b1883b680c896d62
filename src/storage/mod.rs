mod series_buffer;

pub use series_buffer::SeriesBuffer;
