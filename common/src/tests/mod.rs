mod test_sample;
mod test_wind;
