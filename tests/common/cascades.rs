use haar_detector::{Cascade, Feature, Rect, Stage};

/// Accepts only the window at (5, 5) of a 64×64 checkerboard with 8-pixel
/// cells: both stages compare the top-left 2×2 block of the window with the
/// block next to it.
pub fn corner_cascade() -> Cascade {
    let size = [31, 31];
    let diff = |other: Rect| {
        Feature::new(0.001, 0.0, 1.0, size, vec![Rect::new(0, 0, 1, 1, 1.0), other])
    };
    Cascade::new(
        31,
        31,
        vec![
            Stage::new(0.5, vec![diff(Rect::new(1, 0, 1, 1, -1.0))]),
            Stage::new(0.5, vec![diff(Rect::new(0, 1, 1, 1, -1.0))]),
        ],
    )
}

/// Fires when bright content is concentrated in the central quarter of the
/// window: `4 * centre - whole`.
pub fn centre_blob_cascade() -> Cascade {
    let size = [24, 24];
    let feature = Feature::new(
        1.0,
        0.0,
        1.0,
        size,
        vec![Rect::new(0, 0, 24, 24, -1.0), Rect::new(6, 6, 12, 12, 4.0)],
    );
    Cascade::new(24, 24, vec![Stage::new(0.5, vec![feature])])
}

pub const SAMPLE_XML: &str = r#"<?xml version="1.0"?>
<opencv_storage>
<haarcascade_sample type_id="opencv-haar-classifier">
  <size>20 20</size>
  <stages>
    <_>
      <!-- stage 0 -->
      <trees>
        <_>
          <!-- tree 0 -->
          <_>
            <feature>
              <rects>
                <_>3 7 14 4 -1.</_>
                <_>3 9 14 2 2.</_></rects>
              <tilted>0</tilted></feature>
            <threshold>4.0141958743333817e-003</threshold>
            <left_val>0.0337941907346249</left_val>
            <right_val>0.8378106951713562</right_val></_></_>
        <_>
          <_>
            <feature>
              <rects>
                <_>1 2 18 4 -1.</_>
                <_>7 2 6 4 3.</_></rects>
              <tilted>0</tilted></feature>
            <threshold>0.0151513395830989</threshold>
            <left_val>0.1514132022857666</left_val>
            <right_val>0.7488812208175659</right_val></_></_></trees>
      <stage_threshold>0.8226894140243530</stage_threshold>
      <parent>-1</parent>
      <next>-1</next></_>
    <_>
      <!-- stage 1 -->
      <trees>
        <_>
          <_>
            <feature>
              <rects>
                <_>1 2 18 4 -1.</_>
                <_>7 2 6 4 3.</_>
                <_>5 10 10 2 0.5</_></rects>
              <tilted>0</tilted></feature>
            <threshold>-0.0211564302444458</threshold>
            <left_val>0.1789413988590241</left_val>
            <right_val>0.7846146821975708</right_val></_></_></trees>
      <stage_threshold>6.9566087722778320</stage_threshold>
      <parent>0</parent>
      <next>-1</next></_>
  </stages>
</haarcascade_sample>
</opencv_storage>
"#;
