//! Recursive axis-aligned partition with typed leaves.
//!
//! Every node exclusively owns its four children, so the tree has no shared
//! ownership or back-references. Mutation inside the tree is addressed by the
//! child-index path leading to a node, which keeps mutable borrows linear.

use quadcaster_core::{MapBounds, QuadCellType, Rect, WallQuery, PLAYER_FOOTPRINT};
use serde::{Deserialize, Serialize};

use crate::MapShapeError;

const DEFAULT_SIDE: f64 = 8.0;
const DEFAULT_PLAYER: f64 = 3.0;

/// Node of the quadtree: either a typed leaf or four equal quadrants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuadCellRecord", into = "QuadCellRecord")]
pub struct QuadCell {
    rect: Rect,
    content: QuadContent,
}

#[derive(Clone, Debug, PartialEq)]
enum QuadContent {
    Leaf(QuadCellType),
    /// Children in NW, NE, SW, SE order.
    Split(Box<[QuadCell; 4]>),
}

impl QuadCell {
    /// Creates a leaf covering `rect`.
    #[must_use]
    pub const fn leaf(rect: Rect, cell_type: QuadCellType) -> Self {
        Self {
            rect,
            content: QuadContent::Leaf(cell_type),
        }
    }

    /// Rectangle covered by this node.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Reports whether the node has been split into children.
    #[must_use]
    pub const fn is_subdivided(&self) -> bool {
        matches!(self.content, QuadContent::Split(_))
    }

    /// Leaf type, or `None` for subdivided nodes.
    #[must_use]
    pub const fn cell_type(&self) -> Option<QuadCellType> {
        match self.content {
            QuadContent::Leaf(cell_type) => Some(cell_type),
            QuadContent::Split(_) => None,
        }
    }

    /// Children in NW, NE, SW, SE order, or `None` for leaves.
    #[must_use]
    pub fn children(&self) -> Option<&[QuadCell; 4]> {
        match &self.content {
            QuadContent::Leaf(_) => None,
            QuadContent::Split(children) => Some(children),
        }
    }

    fn child_mut(&mut self, index: usize) -> Option<&mut QuadCell> {
        match &mut self.content {
            QuadContent::Leaf(_) => None,
            QuadContent::Split(children) => children.get_mut(index),
        }
    }

    /// Splits a leaf into four empty quadrants.
    ///
    /// Returns `false` without touching the node when it is already split.
    pub fn subdivide(&mut self) -> bool {
        if self.is_subdivided() {
            return false;
        }
        let children = self
            .rect
            .quadrants()
            .map(|rect| QuadCell::leaf(rect, QuadCellType::Empty));
        self.content = QuadContent::Split(Box::new(children));
        true
    }

    /// Marks a leaf as wall. Subdivided nodes are left untouched.
    pub fn paint_wall(&mut self) -> Option<QuadCellType> {
        self.retype(|_| QuadCellType::Wall)
    }

    /// Marks a leaf as empty. Subdivided nodes are left untouched.
    pub fn erase_wall(&mut self) -> Option<QuadCellType> {
        self.retype(|_| QuadCellType::Empty)
    }

    /// Flips a leaf between wall and empty; a player leaf becomes a wall.
    pub fn toggle_wall(&mut self) -> Option<QuadCellType> {
        self.retype(|current| match current {
            QuadCellType::Wall => QuadCellType::Empty,
            QuadCellType::Empty | QuadCellType::Player => QuadCellType::Wall,
        })
    }

    fn retype<F>(&mut self, next: F) -> Option<QuadCellType>
    where
        F: FnOnce(QuadCellType) -> QuadCellType,
    {
        match &mut self.content {
            QuadContent::Leaf(cell_type) => {
                *cell_type = next(*cell_type);
                Some(*cell_type)
            }
            QuadContent::Split(_) => None,
        }
    }

    fn child_index_at(&self, x: f64, y: f64) -> Option<usize> {
        self.children()?
            .iter()
            .position(|child| child.rect.contains(x, y))
    }

    /// Descends towards the point and returns the leaf containing it.
    ///
    /// When no child of a subdivided node contains the point (floating-point
    /// drift after scaling), that node itself is returned.
    #[must_use]
    pub fn find_cell_at(&self, x: f64, y: f64) -> &QuadCell {
        match (self.children(), self.child_index_at(x, y)) {
            (Some(children), Some(index)) => children[index].find_cell_at(x, y),
            _ => self,
        }
    }

    fn path_to(&self, x: f64, y: f64) -> Vec<usize> {
        let mut path = Vec::new();
        let mut cell = self;
        while let (Some(children), Some(index)) = (cell.children(), cell.child_index_at(x, y)) {
            path.push(index);
            cell = &children[index];
        }
        path
    }

    fn descendant_mut(&mut self, path: &[usize]) -> Option<&mut QuadCell> {
        match path.split_first() {
            None => Some(self),
            Some((&index, rest)) => self.child_mut(index)?.descendant_mut(rest),
        }
    }

    /// Wall predicate for a point already inside this node.
    fn is_wall_within(&self, x: f64, y: f64) -> bool {
        match &self.content {
            QuadContent::Leaf(cell_type) => *cell_type == QuadCellType::Wall,
            QuadContent::Split(children) => children
                .iter()
                .find(|child| child.rect.contains(x, y))
                .map_or(true, |child| child.is_wall_within(x, y)),
        }
    }

    /// Resets every player leaf below this node to empty.
    fn clear_player(&mut self) -> usize {
        match &mut self.content {
            QuadContent::Leaf(cell_type) if *cell_type == QuadCellType::Player => {
                *cell_type = QuadCellType::Empty;
                1
            }
            QuadContent::Leaf(_) => 0,
            QuadContent::Split(children) => children.iter_mut().map(Self::clear_player).sum(),
        }
    }

    /// Subdivides until the footprint fits, always descending into the NW
    /// child, then marks the resulting leaf as the player.
    fn settle_player(&mut self, footprint: f64) -> Rect {
        if !self.is_subdivided() && (self.rect.width > footprint || self.rect.height > footprint) {
            let _ = self.subdivide();
        }
        let rect = self.rect;
        match &mut self.content {
            QuadContent::Split(children) => children[0].settle_player(footprint),
            QuadContent::Leaf(cell_type) => {
                *cell_type = QuadCellType::Player;
                rect
            }
        }
    }

    fn scale(&mut self, factor: f64) {
        self.rect = self.rect.scaled(factor);
        if let QuadContent::Split(children) = &mut self.content {
            for child in children.iter_mut() {
                child.scale(factor);
            }
        }
    }

    /// Lazily walks the leaves in pre-order, children visited NW, NE, SW, SE.
    #[must_use]
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }
}

/// Pre-order iterator over the leaves below a node.
#[derive(Clone, Debug)]
pub struct Leaves<'a> {
    stack: Vec<&'a QuadCell>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a QuadCell;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(cell) = self.stack.pop() {
            match &cell.content {
                QuadContent::Leaf(_) => return Some(cell),
                QuadContent::Split(children) => self.stack.extend(children.iter().rev()),
            }
        }
        None
    }
}

/// Quadtree level anchored at the origin, with the authored player start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuadtreeMap {
    root: QuadCell,
    player_x: f64,
    player_y: f64,
    #[serde(default)]
    scale_level: u32,
}

impl Default for QuadtreeMap {
    fn default() -> Self {
        let mut map = Self::new(DEFAULT_SIDE, DEFAULT_SIDE);
        map.player_x = DEFAULT_PLAYER;
        map.player_y = DEFAULT_PLAYER;
        map
    }
}

impl QuadtreeMap {
    /// Creates a single empty leaf spanning `width × height`, player near the center.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            root: QuadCell::leaf(Rect::new(0.0, 0.0, width, height), QuadCellType::Empty),
            player_x: ((width - 1.0) / 2.0).floor().max(0.0),
            player_y: ((height - 1.0) / 2.0).floor().max(0.0),
            scale_level: 0,
        }
    }

    /// Root node of the tree.
    #[must_use]
    pub const fn root(&self) -> &QuadCell {
        &self.root
    }

    /// Authored player start in map units.
    #[must_use]
    pub const fn player(&self) -> (f64, f64) {
        (self.player_x, self.player_y)
    }

    /// Count of resolution doublings applied since authoring.
    #[must_use]
    pub const fn scale_level(&self) -> u32 {
        self.scale_level
    }

    /// Leaf containing the point; see [`QuadCell::find_cell_at`].
    #[must_use]
    pub fn find_cell_at(&self, x: f64, y: f64) -> &QuadCell {
        self.root.find_cell_at(x, y)
    }

    /// Lazily walks every leaf; see [`QuadCell::leaves`].
    #[must_use]
    pub fn leaves(&self) -> Leaves<'_> {
        self.root.leaves()
    }

    /// Number of player-typed leaves; one after any placement, zero before.
    #[must_use]
    pub fn player_leaf_count(&self) -> usize {
        self.leaves()
            .filter(|leaf| leaf.cell_type() == Some(QuadCellType::Player))
            .count()
    }

    fn cell_at_mut(&mut self, x: f64, y: f64) -> Option<&mut QuadCell> {
        let path = self.root.path_to(x, y);
        self.root.descendant_mut(&path)
    }

    /// Splits the leaf under the point. Returns the split rectangle when a leaf
    /// was subdivided.
    pub fn subdivide_at(&mut self, x: f64, y: f64) -> Option<Rect> {
        let cell = self.cell_at_mut(x, y)?;
        cell.subdivide().then_some(cell.rect)
    }

    /// Toggles the wall state of the leaf under the point.
    pub fn toggle_wall_at(&mut self, x: f64, y: f64) -> Option<(Rect, QuadCellType)> {
        let cell = self.cell_at_mut(x, y)?;
        cell.toggle_wall().map(|cell_type| (cell.rect, cell_type))
    }

    /// Marks the leaf under the point as wall.
    pub fn paint_wall_at(&mut self, x: f64, y: f64) -> Option<(Rect, QuadCellType)> {
        let cell = self.cell_at_mut(x, y)?;
        cell.paint_wall().map(|cell_type| (cell.rect, cell_type))
    }

    /// Marks the leaf under the point as empty.
    pub fn erase_wall_at(&mut self, x: f64, y: f64) -> Option<(Rect, QuadCellType)> {
        let cell = self.cell_at_mut(x, y)?;
        cell.erase_wall().map(|cell_type| (cell.rect, cell_type))
    }

    /// Moves the player into the cell under the point.
    ///
    /// Any previous player leaf is cleared, the target is subdivided through
    /// its NW child until it fits the player footprint, and the player start
    /// becomes the center of the resulting leaf, which is returned.
    pub fn place_player(&mut self, x: f64, y: f64) -> Rect {
        let _ = self.root.clear_player();
        let path = self.root.path_to(x, y);
        let leaf = match self.root.descendant_mut(&path) {
            Some(cell) => cell.settle_player(PLAYER_FOOTPRINT),
            None => self.root.settle_player(PLAYER_FOOTPRINT),
        };
        let (center_x, center_y) = leaf.center();
        self.player_x = center_x;
        self.player_y = center_y;
        leaf
    }

    pub(crate) fn scale_geometry(&mut self, factor: f64, level: u32) {
        self.root.scale(factor);
        self.player_x *= factor;
        self.player_y *= factor;
        self.scale_level = level;
    }
}

impl WallQuery for QuadtreeMap {
    fn bounds(&self) -> MapBounds {
        let rect = self.root.rect();
        MapBounds::new(rect.x + rect.width, rect.y + rect.height)
    }

    fn is_wall(&self, x: f64, y: f64) -> bool {
        if !self.root.rect().contains(x, y) {
            return true;
        }
        self.root.is_wall_within(x, y)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuadCellRecord {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    subdivided: bool,
    #[serde(default)]
    cell_type: QuadCellType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<QuadCellRecord>>,
}

impl TryFrom<QuadCellRecord> for QuadCell {
    type Error = MapShapeError;

    fn try_from(record: QuadCellRecord) -> Result<Self, Self::Error> {
        let rect = Rect::new(record.x, record.y, record.width, record.height);
        if !record.subdivided {
            return Ok(Self::leaf(rect, record.cell_type));
        }

        let children = record
            .children
            .unwrap_or_default()
            .into_iter()
            .map(QuadCell::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let count = children.len();
        let children: [QuadCell; 4] = children
            .try_into()
            .map_err(|_| MapShapeError::ChildCount { count })?;

        Ok(Self {
            rect,
            content: QuadContent::Split(Box::new(children)),
        })
    }
}

impl From<QuadCell> for QuadCellRecord {
    fn from(cell: QuadCell) -> Self {
        let Rect {
            x,
            y,
            width,
            height,
        } = cell.rect;
        match cell.content {
            QuadContent::Leaf(cell_type) => Self {
                x,
                y,
                width,
                height,
                subdivided: false,
                cell_type,
                children: None,
            },
            QuadContent::Split(children) => {
                let children: [QuadCell; 4] = *children;
                Self {
                    x,
                    y,
                    width,
                    height,
                    subdivided: true,
                    cell_type: QuadCellType::Empty,
                    children: Some(children.into_iter().map(Self::from).collect()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_root() -> QuadtreeMap {
        let mut map = QuadtreeMap::new(8.0, 8.0);
        assert!(map.subdivide_at(4.0, 4.0).is_some());
        map
    }

    #[test]
    fn subdivide_is_a_no_op_on_split_nodes() {
        let mut cell = QuadCell::leaf(Rect::new(0.0, 0.0, 4.0, 4.0), QuadCellType::Wall);
        assert!(cell.subdivide());
        let once = cell.clone();
        assert!(!cell.subdivide());
        assert_eq!(cell, once);
        assert!(cell
            .children()
            .expect("children")
            .iter()
            .all(|child| child.cell_type() == Some(QuadCellType::Empty)));
    }

    #[test]
    fn subdivided_leaves_tile_the_parent_without_overlap() {
        let map = split_root();
        let leaves: Vec<Rect> = map.leaves().map(QuadCell::rect).collect();
        assert_eq!(leaves.len(), 4);

        let area: f64 = leaves.iter().map(|rect| rect.width * rect.height).sum();
        assert!((area - 64.0).abs() < f64::EPSILON);

        for (index, first) in leaves.iter().enumerate() {
            for second in &leaves[index + 1..] {
                let overlap_x = (first.x + first.width).min(second.x + second.width)
                    - first.x.max(second.x);
                let overlap_y = (first.y + first.height).min(second.y + second.height)
                    - first.y.max(second.y);
                assert!(overlap_x <= 0.0 || overlap_y <= 0.0);
            }
        }
    }

    #[test]
    fn leaves_are_visited_in_pre_order() {
        let mut map = split_root();
        let _ = map.subdivide_at(1.0, 1.0);
        let origins: Vec<(f64, f64)> = map
            .leaves()
            .map(|leaf| (leaf.rect().x, leaf.rect().y))
            .collect();
        assert_eq!(
            origins,
            vec![
                (0.0, 0.0),
                (2.0, 0.0),
                (0.0, 2.0),
                (2.0, 2.0),
                (4.0, 0.0),
                (0.0, 4.0),
                (4.0, 4.0),
            ]
        );
    }

    #[test]
    fn find_cell_at_uses_half_open_bounds() {
        let map = split_root();
        assert_eq!(map.find_cell_at(3.999, 0.0).rect().x, 0.0);
        assert_eq!(map.find_cell_at(4.0, 0.0).rect().x, 4.0);
        assert_eq!(map.find_cell_at(4.0, 4.0).rect(), Rect::new(4.0, 4.0, 4.0, 4.0));
    }

    #[test]
    fn find_cell_at_falls_back_to_the_split_node() {
        let map = split_root();
        let cell = map.find_cell_at(9.0, 9.0);
        assert!(cell.is_subdivided());
        assert_eq!(cell.rect(), Rect::new(0.0, 0.0, 8.0, 8.0));
    }

    #[test]
    fn wall_edits_only_touch_leaves() {
        let mut cell = QuadCell::leaf(Rect::new(0.0, 0.0, 2.0, 2.0), QuadCellType::Empty);
        assert_eq!(cell.toggle_wall(), Some(QuadCellType::Wall));
        assert_eq!(cell.toggle_wall(), Some(QuadCellType::Empty));
        assert!(cell.subdivide());
        assert_eq!(cell.paint_wall(), None);
        assert_eq!(cell.erase_wall(), None);
        assert_eq!(cell.toggle_wall(), None);
    }

    #[test]
    fn place_player_shrinks_through_the_first_child() {
        let mut map = split_root();
        let leaf = map.place_player(1.0, 1.0);

        assert_eq!(leaf, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(map.player(), (0.5, 0.5));
        assert_eq!(map.player_leaf_count(), 1);
        assert_eq!(map.leaves().count(), 10);
        assert!(map
            .leaves()
            .all(|leaf| leaf.cell_type() != Some(QuadCellType::Player)
                || (leaf.rect().width <= 1.0 && leaf.rect().height <= 1.0)));
    }

    #[test]
    fn place_player_does_not_follow_the_click_quadrant() {
        let mut map = QuadtreeMap::new(4.0, 4.0);
        let leaf = map.place_player(3.5, 3.5);
        assert_eq!(leaf, Rect::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn place_player_clears_the_previous_player() {
        let mut map = split_root();
        let _ = map.place_player(1.0, 1.0);
        let _ = map.place_player(6.0, 6.0);

        assert_eq!(map.player_leaf_count(), 1);
        assert_eq!(map.player(), (4.5, 4.5));
        assert_eq!(
            map.find_cell_at(0.5, 0.5).cell_type(),
            Some(QuadCellType::Empty)
        );
    }

    #[test]
    fn wall_query_is_fail_closed() {
        let mut map = split_root();
        let _ = map.paint_wall_at(5.0, 1.0);
        let _ = map.place_player(1.0, 6.0);

        assert!(map.is_wall(5.0, 1.0));
        assert!(!map.is_wall(1.0, 1.0));
        assert!(!map.is_wall(0.5, 4.5));
        assert!(map.is_wall(-0.5, 1.0));
        assert!(map.is_wall(8.0, 1.0));
    }

    #[test]
    fn json_round_trip_preserves_tree_and_geometry() {
        let mut map = split_root();
        let _ = map.paint_wall_at(5.0, 1.0);
        let _ = map.place_player(1.0, 6.0);

        let json = serde_json::to_string(&map).expect("serialize");
        assert!(json.contains("\"subdivided\":true"));
        assert!(json.contains("\"cellType\":\"player\""));
        let restored: QuadtreeMap = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, map);
    }

    #[test]
    fn deserialization_rejects_partial_splits() {
        let json = r#"{
            "root": {
                "x": 0.0, "y": 0.0, "width": 8.0, "height": 8.0,
                "subdivided": true, "cellType": "empty",
                "children": [
                    {"x": 0.0, "y": 0.0, "width": 4.0, "height": 4.0, "subdivided": false, "cellType": "wall"}
                ]
            },
            "playerX": 3.0,
            "playerY": 3.0
        }"#;
        assert!(serde_json::from_str::<QuadtreeMap>(json).is_err());
    }
}
