use cordyceps_edit_tree::EditTree;

fn main() {
    let mut text = EditTree::new();

    for ch in "hello".chars() {
        text.push(ch);
        text.assert_invariants();
    }
    println!("{text:?} (height {}, rotations {})", text.height(), text.rotation_count());

    text.insert(0, '>').unwrap();
    text.assert_invariants();
    println!("{text:?}");

    let removed = text.remove(0).unwrap();
    assert_eq!(removed, '>');
    text.assert_invariants();

    let mut tail = EditTree::from(", world");
    text.concatenate(&mut tail).unwrap();
    text.assert_invariants();
    assert!(tail.is_empty());
    println!("{text:?} (height {}, rotations {})", text.height(), text.rotation_count());

    println!("{:?}", text.substring(7, 5).unwrap());
    println!("{:?}", text.find("world"));

    let mut graph = String::new();
    text.dotgraph("text", &mut graph).unwrap();
    println!("{graph}");
}
