mod error_shape;
