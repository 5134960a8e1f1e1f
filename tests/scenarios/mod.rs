mod concurrency;
mod openweather;
mod resolver;
mod support;
