use crate::core::{bbox::Bbox, intersection::Intersection, ray::Ray};

use super::PrimitiveT;

/// Bounding volume hierarchy built with bucketed SAH splits.
pub struct BvhAccel<P: PrimitiveT> {
    bvh_root: Option<Box<BvhNode>>,
    primitives: Vec<P>,
}

struct BvhNode {
    lc: Option<Box<BvhNode>>,
    rc: Option<Box<BvhNode>>,
    bbox: Bbox,
    start: usize,
    end: usize,
}

impl<P: PrimitiveT> BvhAccel<P> {
    pub fn new(mut primitives: Vec<P>, max_leaf_size: usize, bucket_number: usize) -> Self {
        if primitives.is_empty() {
            return Self {
                bvh_root: None,
                primitives,
            };
        }

        let bbox = primitives
            .iter()
            .fold(Bbox::empty(), |bbox, prim| bbox.merge(prim.bbox()));
        let mut bvh_root = Box::new(BvhNode::new(0, primitives.len(), bbox));

        let mut stack = vec![&mut bvh_root];
        while let Some(u) = stack.pop() {
            if u.size() <= max_leaf_size {
                continue;
            }

            let split = Self::find_best_split(&mut primitives[u.start..u.end], bucket_number);
            let mid = match split {
                Some(offset) => u.start + offset,
                None => continue,
            };

            let left_bbox = Self::bbox_of(&primitives[u.start..mid]);
            let right_bbox = Self::bbox_of(&primitives[mid..u.end]);
            u.lc = Some(Box::new(BvhNode::new(u.start, mid, left_bbox)));
            u.rc = Some(Box::new(BvhNode::new(mid, u.end, right_bbox)));

            let BvhNode { lc, rc, .. } = &mut **u;
            if let (Some(lc), Some(rc)) = (lc.as_mut(), rc.as_mut()) {
                stack.push(lc);
                stack.push(rc);
            }
        }

        Self {
            bvh_root: Some(bvh_root),
            primitives,
        }
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    fn bbox_of(primitives: &[P]) -> Bbox {
        primitives
            .iter()
            .fold(Bbox::empty(), |bbox, prim| bbox.merge(prim.bbox()))
    }

    /// Partitions `primitives` along the widest centroid axis at the cheapest bucket
    /// boundary, returning the size of the left half.
    fn find_best_split(primitives: &mut [P], bucket_number: usize) -> Option<usize> {
        let centroid_bbox = primitives.iter().fold(Bbox::empty(), |bbox, prim| {
            let c = prim.bbox().centroid();
            bbox.merge(Bbox::new(c, c))
        });
        let extent = centroid_bbox.p_max - centroid_bbox.p_min;
        let axis = if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        };
        if extent[axis] < 0.0001 {
            return None;
        }

        let bucket_of = |prim: &P| {
            let offset = (prim.bbox().centroid()[axis] - centroid_bbox.p_min[axis]) / extent[axis];
            ((offset * bucket_number as f32) as usize).min(bucket_number - 1)
        };

        let mut boxes = vec![Bbox::empty(); bucket_number];
        let mut counts = vec![0_usize; bucket_number];
        for prim in primitives.iter() {
            let b = bucket_of(prim);
            boxes[b] = boxes[b].merge(prim.bbox());
            counts[b] += 1;
        }

        let mut best_cost = f32::MAX;
        let mut best_split = 0;
        for split in 1..bucket_number {
            let (left, right) = boxes.split_at(split);
            let left_count: usize = counts[..split].iter().sum();
            let right_count = primitives.len() - left_count;
            if left_count == 0 || right_count == 0 {
                continue;
            }
            let left_area = left.iter().fold(Bbox::empty(), |a, b| a.merge(*b)).surface_area();
            let right_area = right.iter().fold(Bbox::empty(), |a, b| a.merge(*b)).surface_area();
            let cost = left_area * left_count as f32 + right_area * right_count as f32;
            if cost < best_cost {
                best_cost = cost;
                best_split = split;
            }
        }
        if best_split == 0 {
            return None;
        }

        // stable enough: a two-pointer partition on bucket index
        let mut mid = 0;
        for i in 0..primitives.len() {
            if bucket_of(&primitives[i]) < best_split {
                primitives.swap(i, mid);
                mid += 1;
            }
        }
        Some(mid)
    }
}

impl BvhNode {
    fn new(start: usize, end: usize, bbox: Bbox) -> Self {
        Self {
            lc: None,
            rc: None,
            bbox,
            start,
            end,
        }
    }

    fn size(&self) -> usize {
        self.end - self.start
    }

    fn children(&self) -> Option<(&BvhNode, &BvhNode)> {
        match (&self.lc, &self.rc) {
            (Some(lc), Some(rc)) => Some((lc, rc)),
            _ => None,
        }
    }
}

impl<P: PrimitiveT> PrimitiveT for BvhAccel<P> {
    fn intersect_test(&self, ray: &Ray, t_max: f32) -> bool {
        let root = match &self.bvh_root {
            Some(root) => root.as_ref(),
            None => return false,
        };

        let mut stack = vec![root];
        while let Some(u) = stack.pop() {
            if !u.bbox.intersect_test(ray, t_max) {
                continue;
            }
            match u.children() {
                Some((lc, rc)) => {
                    stack.push(lc);
                    stack.push(rc);
                }
                None => {
                    if self.primitives[u.start..u.end]
                        .iter()
                        .any(|prim| prim.intersect_test(ray, t_max))
                    {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn intersect(&self, ray: &Ray, inter: &mut Intersection) -> bool {
        let root = match &self.bvh_root {
            Some(root) => root.as_ref(),
            None => return false,
        };

        let mut stack = vec![root];
        let mut result = false;
        while let Some(u) = stack.pop() {
            if !u.bbox.intersect_test(ray, inter.t) {
                continue;
            }
            match u.children() {
                Some((lc, rc)) => {
                    stack.push(lc);
                    stack.push(rc);
                }
                None => {
                    for prim in &self.primitives[u.start..u.end] {
                        result |= prim.intersect(ray, inter);
                    }
                }
            }
        }
        result
    }

    fn bbox(&self) -> Bbox {
        match &self.bvh_root {
            Some(root) => root.bbox,
            None => Bbox::empty(),
        }
    }
}
