mod grid;
mod lifecycle;
