use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::frame::{
    image::{ImageData, ImageFormat},
    source::StillSource,
};

fn rgba() -> ImageRequest {
    ImageRequest::new(ImageFormat::Rgba)
}

#[test]
fn stack_pops_in_reverse_push_order() {
    let mut f = Frame::new(0);
    let staged = Frame::new(1).into_shared();
    f.push_frame(None);
    f.push_frame(Some(staged.clone()));
    f.push_service(Arc::new(42u32));

    let service = f.pop_service().unwrap();
    assert_eq!(service.downcast_ref::<u32>(), Some(&42));
    let popped = f.pop_frame().unwrap().unwrap();
    assert!(Arc::ptr_eq(&popped, &staged));
    assert!(f.pop_frame().unwrap().is_none());
    assert_eq!(f.stack_len(), 0);
}

#[test]
fn popping_the_wrong_kind_is_a_stack_error() {
    let mut f = Frame::new(0);
    f.push_frame(None);
    assert!(matches!(f.pop_service(), Err(LumaError::Stack(_))));
    assert!(matches!(f.pop_frame(), Err(LumaError::Stack(_))));
}

#[test]
fn plain_frame_reads_its_source_and_memoizes() {
    let mut f = Frame::with_source(3, StillSource::solid(2, 1, [9, 8, 7, 255]));
    let img = f.get_image(&rgba()).unwrap();
    assert_eq!((img.width, img.height), (2, 1));
    assert_eq!(img.pixels().unwrap(), &[9, 8, 7, 255, 9, 8, 7, 255]);
    assert_eq!(f.cached_image(), Some(&img));
}

#[test]
fn callback_runs_once_then_cached_image_is_returned() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    fn tint(frame: &mut Frame, request: &ImageRequest) -> LumaResult<Image> {
        CALLS.fetch_add(1, Ordering::SeqCst);
        let base = frame.get_image(request)?;
        let px: Vec<u8> = base.pixels()?.iter().map(|v| v / 2).collect();
        Ok(Image {
            data: ImageData::Pixels(Arc::new(px)),
            ..base
        })
    }

    let mut f = Frame::with_source(0, StillSource::solid(1, 1, [200, 100, 50, 254]));
    f.push_get_image(tint);

    let first = f.get_image(&rgba()).unwrap();
    let second = f.get_image(&rgba()).unwrap();
    assert_eq!(first.pixels().unwrap(), &[100, 50, 25, 127]);
    assert_eq!(first, second);
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    assert_eq!(f.stack_len(), 0);
}

#[test]
fn failed_pull_restores_the_staged_stack() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    fn fail(frame: &mut Frame, _request: &ImageRequest) -> LumaResult<Image> {
        CALLS.fetch_add(1, Ordering::SeqCst);
        frame.pop_service()?;
        frame.pop_frame()?;
        Err(LumaError::acquisition("decoder gave up"))
    }

    let mut f = Frame::with_source(0, StillSource::solid(1, 1, [1, 2, 3, 4]));
    f.push_frame(None);
    f.push_service(Arc::new(7u8));
    f.push_get_image(fail);

    for attempt in 1..=2 {
        let err = f.get_image(&rgba()).unwrap_err();
        assert!(err.to_string().contains("decoder gave up"));
        assert!(f.cached_image().is_none());
        assert_eq!(f.stack_len(), 3);
        assert_eq!(CALLS.load(Ordering::SeqCst), attempt);
    }

    assert!(matches!(f.pop(), Some(StackItem::GetImage(_))));
    assert!(f.pop_service().is_ok());
    assert!(f.pop_frame().unwrap().is_none());
}

#[test]
fn frame_without_source_fails_acquisition() {
    let mut f = Frame::new(5);
    assert!(matches!(
        f.get_image(&rgba()),
        Err(LumaError::Acquisition(_))
    ));
}

#[test]
fn non_callback_on_top_is_left_in_place() {
    let mut f = Frame::new(0);
    f.push_frame(None);
    assert!(matches!(f.get_image(&rgba()), Err(LumaError::Stack(_))));
    assert_eq!(f.stack_len(), 1);
}

#[test]
fn attachments_are_dropped_with_the_frame() {
    let shared = Frame::new(1).into_shared();
    let mut f = Frame::new(0);
    f.attach("luma.1", shared.clone());
    assert_eq!(Arc::strong_count(&shared), 2);
    assert!(f.attachment::<SharedFrame>("luma.1").is_some());
    assert!(f.attachment::<u8>("luma.1").is_none());
    drop(f);
    assert_eq!(Arc::strong_count(&shared), 1);
}

#[test]
fn distort_flag_reads_from_properties() {
    let mut f = Frame::new(0);
    assert!(!f.is_distort());
    f.properties_mut().set_int(DISTORT, 1);
    assert!(f.is_distort());
}

#[test]
fn writable_pull_gets_an_unshared_copy_of_the_memoized_image() {
    let mut f = Frame::with_source(0, StillSource::solid(1, 1, [5, 6, 7, 8]));
    let shared = f.get_image(&rgba()).unwrap();
    let again = f.get_image(&rgba()).unwrap();
    let owned = f
        .get_image(&ImageRequest {
            writable: true,
            ..rgba()
        })
        .unwrap();

    let (ImageData::Pixels(a), ImageData::Pixels(b), ImageData::Pixels(c)) =
        (&shared.data, &again.data, &owned.data)
    else {
        panic!("still sources deliver pixels");
    };
    assert!(Arc::ptr_eq(a, b));
    assert!(!Arc::ptr_eq(a, c));
    assert_eq!(owned, shared);
}
