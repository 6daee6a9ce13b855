use core::pin::pin;

use dangling::{BadAccess, Ptr, Target};

#[derive(Default)]
struct Object;

#[test]
fn handles_register_and_unregister_on_scope() {
    let obj = pin!(Target::new(Object));
    {
        let p1 = Ptr::new(obj.as_ref());
        assert_eq!(obj.observers(), 1);
        assert!(p1.is_some() && p1.points_to(&obj));

        let p2 = Ptr::new(obj.as_ref());
        assert_eq!(obj.observers(), 2);
        assert!(p1.is_some() && p1.points_to(&obj));
        assert!(p2.is_some() && p2.points_to(&obj));
    }
    assert_eq!(obj.observers(), 0);
}

#[test]
fn dropping_target_nulls_every_handle() {
    let obj = Box::pin(Target::new(Object));
    let p1 = Ptr::new(obj.as_ref());
    let p2 = Ptr::new(obj.as_ref());
    assert_eq!(obj.observers(), 2);
    assert!(p1.points_to(&obj) && p2.points_to(&obj));
    assert_eq!(p1, p2);

    drop(obj);

    assert!(p1.is_null());
    assert!(p1.get().is_none());
    assert!(p2.is_null());
    assert!(p2.get().is_none());
    assert_eq!(p1, p2);
    assert_eq!(p1.try_borrow().err(), Some(BadAccess));
    assert_eq!(p2.try_borrow().err(), Some(BadAccess));
}

#[test]
fn handles_outliving_target_drop_cleanly() {
    let mut handles = Vec::new();
    {
        let obj = pin!(Target::new(Object));
        for _ in 0..16 {
            handles.push(Ptr::new(obj.as_ref()));
        }
        assert_eq!(obj.observers(), 16);
    }
    assert!(handles.iter().all(Ptr::is_null));
    handles.clear();
}

#[test]
fn default_and_from_none_are_null() {
    let a = Ptr::<Object>::default();
    let b = Ptr::<Object>::from(None);
    assert!(a.is_null() && b.is_null());
    assert_eq!(a, b);
}

#[test]
fn from_pinned_target() {
    let obj = Box::pin(Target::<Object>::default());
    let a = Ptr::from(obj.as_ref());
    let b = Ptr::from(Some(obj.as_ref()));
    assert_eq!(obj.observers(), 2);
    assert_eq!(a, b);
}

#[test]
fn handles_inside_targets() {
    struct Node {
        next: Ptr<Node>,
    }

    let tail = Box::pin(Target::new(Node { next: Ptr::null() }));
    let head = Box::pin(Target::new(Node { next: Ptr::new(tail.as_ref()) }));
    assert_eq!(tail.observers(), 1);
    assert!(head.next.points_to(&tail));

    drop(tail);
    assert!(head.next.is_null());
    drop(head);
}

#[test]
fn target_observing_itself() {
    use core::cell::RefCell;

    struct Node {
        me: RefCell<Ptr<Node>>,
    }

    let node = Box::pin(Target::new(Node { me: RefCell::new(Ptr::null()) }));
    node.me.borrow_mut().reset(Some(node.as_ref()));
    assert_eq!(node.observers(), 1);
    drop(node);
}
