//! Parser for the OpenCV-style Haar cascade markup.
//!
//! Expected nesting (element names as in the reference files, `_` being the
//! anonymous sequence item):
//!
//! ```text
//! <opencv_storage>
//!   <cascade_name type_id="opencv-haar-classifier">
//!     <size>24 24</size>
//!     <stages>
//!       <_>                                  stage
//!         <trees>
//!           <_>                              tree
//!             <_>                            root node
//!               <feature>
//!                 <rects><_>6 4 12 9 -1.</_><_>6 7 12 3 3.</_></rects>
//!                 <tilted>0</tilted>
//!               </feature>
//!               <threshold>-0.0315</threshold>
//!               <left_val>2.0875</left_val>
//!               <right_val>-2.2172</right_val>
//!             </_>
//!           </_>
//!         </trees>
//!         <stage_threshold>0.8227</stage_threshold>
//!       </_>
//!     </stages>
//!   </cascade_name>
//! </opencv_storage>
//! ```
//!
//! Comment nodes are skipped. Only stump trees (a single node carrying
//! `left_val`/`right_val`) are representable; anything else is rejected. The
//! `tilted` flag is read past and features are always evaluated upright.
use super::error::CascadeError;
use super::{Cascade, Feature, Rect, Stage};
use roxmltree::{Document, Node};
use std::str::FromStr;

/// Parse cascade markup into a [`Cascade`].
pub fn parse(text: &str) -> Result<Cascade, CascadeError> {
    let doc = Document::parse(text)?;
    let root = doc
        .descendants()
        .find(|n| n.is_element() && child(*n, "stages").is_some())
        .ok_or_else(|| CascadeError::structure("no element with a <stages> child"))?;

    let size_text = child_text(root, "size")?;
    let mut dims = size_text.split_whitespace();
    let size_x: i32 = parse_num(dims.next(), "size")?;
    let size_y: i32 = parse_num(dims.next(), "size")?;
    let size = [size_x, size_y];

    let stages_node = child(root, "stages")
        .ok_or_else(|| CascadeError::structure("missing <stages>"))?;
    let stages = items(stages_node)
        .enumerate()
        .map(|(i, stage)| parse_stage(stage, size).map_err(|e| at("stage", i, e)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Cascade::new(size_x, size_y, stages))
}

fn parse_stage(stage: Node, size: [i32; 2]) -> Result<Stage, CascadeError> {
    let threshold: f64 = parse_num(Some(&child_text(stage, "stage_threshold")?), "stage_threshold")?;
    let trees = child(stage, "trees").ok_or_else(|| CascadeError::structure("missing <trees>"))?;
    let features = items(trees)
        .enumerate()
        .map(|(i, tree)| parse_tree(tree, size).map_err(|e| at("tree", i, e)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Stage::new(threshold, features))
}

fn parse_tree(tree: Node, size: [i32; 2]) -> Result<Feature, CascadeError> {
    let node = items(tree)
        .next()
        .ok_or_else(|| CascadeError::structure("empty tree"))?;
    if child(node, "left_val").is_none() || child(node, "right_val").is_none() {
        return Err(CascadeError::structure(
            "only single-node trees with left_val/right_val are supported",
        ));
    }
    let threshold: f64 = parse_num(Some(&child_text(node, "threshold")?), "threshold")?;
    let left: f64 = parse_num(Some(&child_text(node, "left_val")?), "left_val")?;
    let right: f64 = parse_num(Some(&child_text(node, "right_val")?), "right_val")?;

    let feature = child(node, "feature").ok_or_else(|| CascadeError::structure("missing <feature>"))?;
    let rects_node =
        child(feature, "rects").ok_or_else(|| CascadeError::structure("missing <rects>"))?;
    let rects = items(rects_node)
        .map(|r| parse_rect(&element_text(r)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Feature::new(threshold, left, right, size, rects))
}

/// `"x y w h weight"` → `Rect { x1: x, x2: y, y1: w, y2: h, weight }`.
fn parse_rect(text: &str) -> Result<Rect, CascadeError> {
    let mut parts = text.split_whitespace();
    let x1 = parse_num(parts.next(), "rect")?;
    let x2 = parse_num(parts.next(), "rect")?;
    let y1 = parse_num(parts.next(), "rect")?;
    let y2 = parse_num(parts.next(), "rect")?;
    let weight = parse_num(parts.next(), "rect weight")?;
    Ok(Rect::new(x1, x2, y1, y2, weight))
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

fn child_text(node: Node, name: &str) -> Result<String, CascadeError> {
    child(node, name)
        .map(|c| element_text(c).trim().to_owned())
        .ok_or_else(|| CascadeError::structure(format!("missing <{name}>")))
}

/// All text inside `node` with comments cut out.
fn element_text(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Element children named `_`, in document order.
fn items<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(|c| c.is_element() && c.tag_name().name() == "_")
}

fn parse_num<T: FromStr>(token: Option<&str>, what: &str) -> Result<T, CascadeError>
where
    T::Err: std::fmt::Display,
{
    let token = token.ok_or_else(|| CascadeError::structure(format!("missing {what} value")))?;
    token
        .trim()
        .parse()
        .map_err(|e| CascadeError::structure(format!("bad {what} value {token:?}: {e}")))
}

fn at(kind: &str, index: usize, err: CascadeError) -> CascadeError {
    match err {
        CascadeError::Structure(msg) => CascadeError::Structure(format!("{kind} {index}: {msg}")),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<opencv_storage>
<haarcascade_test type_id="opencv-haar-classifier">
  <size>24 24</size>
  <stages>
    <_>
      <!-- stage 0 -->
      <trees>
        <_>
          <!-- tree 0 -->
          <_>
            <!-- root node -->
            <feature>
              <rects>
                <_>6 4 12 9 -1.</_>
                <_>6 7 12 3 3.</_></rects>
              <tilted>0</tilted></feature>
            <threshold>-0.0315119996666908</threshold>
            <left_val>2.0875380039215088</left_val>
            <right_val>-2.2172100543975830</right_val></_></_>
        <_>
          <_>
            <feature>
              <rects>
                <_>6 4 12 7 -1.</_>
                <_>10 4 4 7 3.</_></rects>
              <tilted>0</tilted></feature>
            <threshold>0.0123960003256798</threshold>
            <left_val>-1.8633940219879150</left_val>
            <right_val>1.3272049427032471</right_val></_></_></trees>
      <stage_threshold>-4.8497151136398315</stage_threshold>
      <parent>-1</parent>
      <next>-1</next></_>
  </stages>
</haarcascade_test>
</opencv_storage>
"#;

    #[test]
    fn parses_reference_layout() {
        let c = parse(SAMPLE).unwrap();
        assert_eq!(c.size(), [24, 24]);
        assert_eq!(c.stage_count(), 1);
        let stage = &c.stages()[0];
        assert_eq!(stage.threshold(), -4.8497151136398315);
        assert_eq!(stage.features().len(), 2);

        let f = &stage.features()[0];
        assert_eq!(f.threshold(), -0.0315119996666908);
        assert_eq!(f.left_val(), 2.0875380039215088);
        assert_eq!(f.right_val(), -2.2172100543975830);
        assert_eq!(f.size(), [24, 24]);
        assert_eq!(
            f.rects(),
            &[Rect::new(6, 4, 12, 9, -1.0), Rect::new(6, 7, 12, 3, 3.0)]
        );
    }

    #[test]
    fn rejects_branching_trees() {
        let text = SAMPLE.replace(
            "<left_val>2.0875380039215088</left_val>",
            "<left_node>1</left_node>",
        );
        let err = parse(&text).unwrap_err();
        assert!(
            err.to_string().contains("stage 0: tree 0"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn rejects_short_rect() {
        let text = SAMPLE.replace("<_>6 4 12 9 -1.</_>", "<_>6 4 12</_>");
        assert!(matches!(parse(&text), Err(CascadeError::Structure(_))));
    }

    #[test]
    fn comments_inside_values_are_cut_out() {
        let text = SAMPLE
            .replace("<_>6 4 12 9 -1.</_>", "<_>6 4 <!-- w h --> 12 9 -1.</_>")
            .replace(
                "<threshold>-0.0315119996666908</threshold>",
                "<threshold>-0.03151<!-- split -->19996666908</threshold>",
            )
            .replace("<size>24 24</size>", "<size>24 <!-- height -->24</size>");
        assert_eq!(parse(&text).unwrap(), parse(SAMPLE).unwrap());
    }

    #[test]
    fn rejects_malformed_markup() {
        assert!(matches!(parse("<a><b></a>"), Err(CascadeError::Xml(_))));
    }
}
