mod test_regression;
