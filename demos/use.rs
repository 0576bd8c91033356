use avl_containers::{AvlTreeMap, AvlTreeMultiset, AvlTreeSet};

fn main() {
    let mut map = AvlTreeMap::new();
    map.insert(0, "zero");
    map.insert(1, "one");
    map.insert(2, "two");
    map.insert(2, "deux");
    map.insert(3, "three");
    map.insert(4, "four");
    map.insert(5, "five");
    assert_eq!(map.get(&2), Some(&"two"));
    map.insert_or_assign(2, "deux");
    assert_eq!(map.get(&2), Some(&"deux"));
    map.remove(&1);
    assert!(map.get(&1).is_none());
    assert!(map.at(&1).is_err());

    for (k, v) in &map {
        println!("{k} => {v}");
    }

    let mut cursor = map.cursor_end();
    cursor.move_prev();
    println!("largest: {:?}", cursor.get());

    let mut set = AvlTreeSet::new();
    for x in 0..5 {
        set.insert(x);
    }
    assert!(set.contains(&1));
    set.remove(&1);
    assert!(!set.contains(&1));
    println!("{set:?}");

    let mut words = AvlTreeMultiset::new();
    for word in "the quick fox jumps over the lazy dog the end".split(' ') {
        words.insert(word);
    }
    let (mut first, last) = words.equal_range(&"the");
    while first != last {
        print!("{:?} ", first.get());
        first.move_next();
    }
    println!();
    println!("'the' occurs {} times in {:?}", words.count(&"the"), words);
}
