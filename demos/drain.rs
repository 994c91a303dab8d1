fn drain(queue: Queue) {
    while queue.ready() {
        let item = queue.next();
        if item.poisoned() {
            break;
        }
        if item.stale() {
            continue;
        }
        handle(item);
    }
    report();
}
