use super::*;
use crate::foundation::core::Fps;

#[test]
fn wipe_dir_parses_aliases() {
    assert_eq!(WipeDir::parse("ttb").unwrap(), WipeDir::TopToBottom);
    assert_eq!(WipeDir::parse(" Left_To_Right ").unwrap(), WipeDir::LeftToRight);
    assert_eq!(WipeDir::parse("righttoleft").unwrap(), WipeDir::RightToLeft);
    assert_eq!(WipeDir::parse("btt").unwrap(), WipeDir::BottomToTop);
    assert!(WipeDir::parse("diagonal").is_err());
}

#[test]
fn ramp_runs_dark_to_light_along_the_wipe() {
    let ltr = linear_ramp(3, 1, WipeDir::LeftToRight);
    let row: Vec<u8> = ltr.pixels().map(|p| p.0[0]).collect();
    assert_eq!(row, vec![0, 128, 255]);

    let btt = linear_ramp(1, 3, WipeDir::BottomToTop);
    let col: Vec<u8> = btt.pixels().map(|p| p.0[0]).collect();
    assert_eq!(col, vec![255, 128, 0]);
}

#[test]
fn single_pixel_ramp_does_not_divide_by_zero() {
    let img = linear_ramp(1, 1, WipeDir::LeftToRight);
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
}

#[test]
fn frames_match_profile_geometry() {
    let profile = Profile::new(4, 2, Fps::new(25, 1).unwrap()).unwrap();
    let mut p = GradientProducer::new(&profile, "wipe:ltr", WipeDir::LeftToRight);
    p.seek(7);
    let mut f = p.get_frame(0).unwrap();
    let img = f
        .get_image(&crate::frame::image::ImageRequest::new(
            crate::frame::image::ImageFormat::Rgba,
        ))
        .unwrap();
    assert_eq!((img.width, img.height), (4, 2));
}
