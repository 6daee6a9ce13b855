use core::pin::pin;

use dangling::{Ptr, Target};

struct Object;

#[test]
fn move_keeps_registration() {
    let obj = pin!(Target::new(Object));
    let mut p1 = Ptr::new(obj.as_ref());
    let n = Ptr::<Object>::null();
    let mut m = Ptr::new(obj.as_ref());
    drop(m.take());

    assert_eq!(obj.observers(), 1);
    assert!(p1.points_to(&obj));

    {
        let p2 = p1.take();
        assert_eq!(obj.observers(), 1);
        assert!(p1.is_null());
        assert!(p2.points_to(&obj));
    }

    {
        let p2 = n;
        assert!(p2.is_null());
    }

    {
        let p2 = m.take();
        assert!(p2.is_null());
        assert!(m.is_null());
    }

    assert_eq!(obj.observers(), 0);
    assert!(p1.is_null());
}

#[test]
fn plain_move_keeps_registration() {
    let obj = pin!(Target::new(Object));
    let p1 = Ptr::new(obj.as_ref());
    let boxed = Box::new(p1);
    assert_eq!(obj.observers(), 1);
    let mut handles = vec![*boxed];
    assert_eq!(obj.observers(), 1);
    assert!(handles[0].points_to(&obj));
    handles.pop();
    assert_eq!(obj.observers(), 0);
}

#[test]
fn move_assign() {
    let obj1 = pin!(Target::new(Object));
    let obj2 = pin!(Target::new(Object));
    let mut p1 = Ptr::new(obj1.as_ref());
    let mut p2 = Ptr::new(obj2.as_ref());
    let mut n = Ptr::<Object>::null();
    let mut m = Ptr::new(obj1.as_ref());
    drop(m.take());

    assert_eq!(obj1.observers(), 1);
    assert_eq!(obj2.observers(), 1);
    assert!(p2.points_to(&obj2));

    p2 = p1.take();
    assert_eq!(obj1.observers(), 1);
    assert_eq!(obj2.observers(), 0);
    assert!(p1.is_null());
    assert!(p2.points_to(&obj1));

    // self move
    p2 = p2.take();
    assert_eq!(obj1.observers(), 1);
    assert_eq!(obj2.observers(), 0);
    assert!(p1.is_null());
    assert!(p2.points_to(&obj1));

    // both observe the same target
    p1.clone_from(&p2);
    p2 = p1.take();
    assert_eq!(obj1.observers(), 1);
    assert_eq!(obj2.observers(), 0);
    assert!(p1.is_null());
    assert!(p2.points_to(&obj1));

    p1.clone_from(&p2);
    p2 = n.take();
    assert_eq!(obj1.observers(), 1);
    assert!(p1.points_to(&obj1));
    assert!(p2.is_null());

    p2.clone_from(&p1);
    assert_eq!(obj1.observers(), 2);
    assert!(p2.points_to(&obj1));

    p2 = m.take();
    assert_eq!(obj1.observers(), 1);
    assert_eq!(obj2.observers(), 0);
    assert!(p1.points_to(&obj1));
    assert!(p2.is_null());

    p2.clone_from(&p1);
    assert_eq!(obj1.observers(), 2);
    assert_eq!(obj2.observers(), 0);
    assert!(p1.points_to(&obj1));
    assert!(p2.points_to(&obj1));
}

#[test]
fn move_assign_releases_destination() {
    let a = pin!(Target::new(Object));
    let b = pin!(Target::new(Object));
    let mut p1 = Ptr::new(a.as_ref());
    let mut p2 = Ptr::new(b.as_ref());
    assert!(p2.points_to(&b));

    p2 = p1.take();
    assert_eq!(a.observers(), 1);
    assert_eq!(b.observers(), 0);
    assert!(p1.is_null());
    assert!(p2.points_to(&a));
}

#[test]
fn mem_take_and_replace() {
    let a = pin!(Target::new(Object));
    let b = pin!(Target::new(Object));
    let mut p = Ptr::new(a.as_ref());

    let old = core::mem::replace(&mut p, Ptr::new(b.as_ref()));
    assert_eq!(a.observers(), 1);
    assert_eq!(b.observers(), 1);
    assert!(old.points_to(&a));

    let taken = core::mem::take(&mut p);
    assert!(p.is_null());
    assert!(taken.points_to(&b));
    assert_eq!(b.observers(), 1);
}
