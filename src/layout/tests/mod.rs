mod test_decompose_basic;
mod test_interior_basic;
