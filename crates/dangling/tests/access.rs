use core::pin::pin;

use dangling::{BadAccess, Ptr, Ref, Target};

struct Object {
    id: u32,
}

impl Object {

    fn this(&self) -> *const Object {
        self
    }
}

#[test]
fn dereferencing() {
    let obj = pin!(Target::new(Object { id: 7 }));
    let p = Ptr::new(obj.as_ref());

    assert!(p.is_some());
    assert!(p.points_to(&obj));
    let value = p.try_borrow().unwrap();
    assert!(core::ptr::eq(&*value, &**obj));
    assert_eq!(value.this(), &**obj as *const Object);
    assert_eq!(value.id, 7);
}

#[test]
fn null_dereferencing() {
    let n = Ptr::<Object>::null();
    let mut m = Ptr::<Object>::null();
    drop(m.take());

    assert!(n.is_null());
    assert!(n.get().is_none());
    assert_eq!(n.try_borrow().err(), Some(BadAccess));
    assert_eq!(n.with(Object::this), Err(BadAccess));

    assert!(m.is_null());
    assert!(m.get().is_none());
    assert_eq!(m.try_borrow().err(), Some(BadAccess));
    assert_eq!(m.with(Object::this), Err(BadAccess));
}

#[test]
fn guards_are_counted() {
    let obj = pin!(Target::new(Object { id: 1 }));
    let p1 = Ptr::new(obj.as_ref());
    let p2 = p1.clone();
    {
        let a = p1.try_borrow().unwrap();
        let b = p2.try_borrow().unwrap();
        assert_eq!(obj.borrows(), 2);
        assert!(core::ptr::eq(Ref::target(&a), Ref::target(&b)));
    }
    assert_eq!(obj.borrows(), 0);
}

#[test]
fn with_returns_closure_result() {
    let obj = pin!(Target::new(Object { id: 3 }));
    let p = Ptr::new(obj.as_ref());
    assert_eq!(p.with(|o| o.id * 2), Ok(6));
    assert_eq!(obj.borrows(), 0);
}

#[test]
fn guard_formats_like_value() {
    let obj = pin!(Target::new(String::from("text")));
    let p = Ptr::new(obj.as_ref());
    let value = p.try_borrow().unwrap();
    assert_eq!(format!("{}", value), "text");
    assert_eq!(format!("{:?}", value), "\"text\"");
}

#[test]
fn interior_mutability_through_handles() {
    use core::cell::Cell;

    let counter = pin!(Target::new(Cell::new(0u32)));
    let p = Ptr::new(counter.as_ref());
    for _ in 0..3 {
        p.with(|c| c.set(c.get() + 1)).unwrap();
    }
    assert_eq!(counter.get(), 3);
}

#[test]
fn bad_access_message() {
    let p = Ptr::<Object>::null();
    let err = p.try_borrow().err().unwrap();
    assert_eq!(err.to_string(), "bad dangling::Ptr access");
}
