fn classify(n: i64) -> i64 {
    if n < 0 {
        return -1;
    } else if n == 0 {
        return 0;
    }
    1
}
