//! Vertex buffer layouts.

use arrayvec::ArrayVec;

use crate::gl;

/// The maximum number of attributes a layout may describe.
pub const MAX_ATTRIBUTES: usize = 16;

/// Attribute component types.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ElementType {
    /// 32-bit floating point number.
    F32,

    /// Unsigned 32-bit integer.
    U32,

    /// Unsigned normalized 8-bit rational.
    U8,
}

/// Driver type code, byte size and normalization for one element type.
#[derive(Clone, Copy, Debug)]
struct TypeInfo {
    gl_type: u32,
    size: usize,
    normalized: bool,
}

/// Indexed by `ElementType as usize`.
const TYPE_INFO: [TypeInfo; 3] = [
    TypeInfo { gl_type: gl::FLOAT, size: 4, normalized: false },
    TypeInfo { gl_type: gl::UNSIGNED_INT, size: 4, normalized: false },
    TypeInfo { gl_type: gl::UNSIGNED_BYTE, size: 1, normalized: true },
];

impl ElementType {
    fn info(self) -> &'static TypeInfo {
        &TYPE_INFO[self as usize]
    }

    /// Returns the corresponding GL data type enumeration constant.
    pub fn gl_type(self) -> u32 {
        self.info().gl_type
    }

    /// Returns the size of one component in bytes.
    pub fn size(self) -> usize {
        self.info().size
    }

    /// Returns true if fixed-point data is normalized to `[0, 1]`.
    pub fn normalized(self) -> bool {
        self.info().normalized
    }
}

/// Rust types that can appear as attribute components.
pub trait Component: bytemuck::Pod {
    /// The corresponding element type.
    const TYPE: ElementType;
}

impl Component for f32 {
    const TYPE: ElementType = ElementType::F32;
}

impl Component for u32 {
    const TYPE: ElementType = ElementType::U32;
}

impl Component for u8 {
    const TYPE: ElementType = ElementType::U8;
}

/// Describes one attribute: its component type and count.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Element {
    /// Component type.
    pub ty: ElementType,

    /// Number of components, 1 to 4.
    pub count: u8,

    /// Whether fixed-point data is normalized.
    pub normalized: bool,
}

impl Element {
    /// Returns the number of bytes the attribute occupies in each vertex.
    pub fn size(&self) -> usize {
        self.ty.size() * self.count as usize
    }
}

/// An element together with the slot and byte offset it is bound at.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Attribute {
    /// Attribute slot, i.e. the position of the element in the layout.
    pub index: u32,

    /// Byte offset of the attribute from the start of each vertex.
    pub offset: usize,

    /// The attribute description.
    pub element: Element,
}

/// Describes how one vertex buffer's bytes split into shader attributes.
///
/// Attributes are interleaved in push order: the `n`th pushed element is
/// read from slot `n`, at the sum of the sizes of the elements before it.
///
/// ```rust
/// use glwrap::{ElementType, Layout};
///
/// let mut layout = Layout::new();
/// layout.push(ElementType::F32, 2).push(ElementType::F32, 4);
/// assert_eq!(layout.stride(), 24);
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Layout {
    elements: ArrayVec<Element, MAX_ATTRIBUTES>,
    stride: usize,
}

impl Layout {
    /// Constructor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute of `count` components of type `ty`.
    ///
    /// # Panics
    ///
    /// Panics if `count` is not in `1 ..= 4` or the layout already holds
    /// `MAX_ATTRIBUTES` elements. Both are static configuration mistakes.
    pub fn push(&mut self, ty: ElementType, count: u8) -> &mut Self {
        assert!(
            (1 ..= 4).contains(&count),
            "attribute component count must be 1 to 4, got {}",
            count,
        );
        let element = Element {
            ty,
            count,
            normalized: ty.normalized(),
        };
        if self.elements.try_push(element).is_err() {
            panic!("layout exceeds {} attributes", MAX_ATTRIBUTES);
        }
        self.stride += element.size();
        self
    }

    /// Appends an attribute whose component type is given by `T`.
    pub fn push_typed<T: Component>(&mut self, count: u8) -> &mut Self {
        self.push(T::TYPE, count)
    }

    /// Returns the elements in slot order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Returns the number of bytes per vertex.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns true if no element has been pushed.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Walks the elements, yielding each with its slot and byte offset.
    pub fn iter(&self) -> Iter {
        Iter {
            elements: self.elements.iter().enumerate(),
            offset: 0,
        }
    }
}

/// Iterator returned by [`Layout::iter`].
///
/// [`Layout::iter`]: struct.Layout.html#method.iter
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    elements: std::iter::Enumerate<std::slice::Iter<'a, Element>>,
    offset: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Attribute;

    fn next(&mut self) -> Option<Attribute> {
        let (index, element) = self.elements.next()?;
        let attribute = Attribute {
            index: index as u32,
            offset: self.offset,
            element: *element,
        };
        self.offset += element.size();
        Some(attribute)
    }
}

impl<'a> IntoIterator for &'a Layout {
    type Item = Attribute;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_sums_component_sizes() {
        let mut layout = Layout::new();
        layout
            .push_typed::<f32>(3)
            .push_typed::<u8>(4)
            .push_typed::<u32>(1);
        assert_eq!(layout.stride(), 3 * 4 + 4 + 4);
        assert_eq!(layout.elements().len(), 3);
    }

    #[test]
    fn offsets_are_running_sums() {
        let mut layout = Layout::new();
        layout.push(ElementType::F32, 2).push(ElementType::F32, 4);
        let offsets: Vec<_> = layout.iter().map(|a| (a.index, a.offset)).collect();
        assert_eq!(offsets, vec![(0, 0), (1, 8)]);
        assert_eq!(layout.stride(), 24);
    }

    #[test]
    fn only_bytes_are_normalized() {
        let mut layout = Layout::new();
        layout.push(ElementType::F32, 1).push(ElementType::U32, 1).push(ElementType::U8, 4);
        let normalized: Vec<_> = layout.elements().iter().map(|e| e.normalized).collect();
        assert_eq!(normalized, vec![false, false, true]);
        assert_eq!(ElementType::U8.gl_type(), gl::UNSIGNED_BYTE);
    }

    #[test]
    #[should_panic(expected = "component count")]
    fn zero_components_fail_fast() {
        Layout::new().push(ElementType::F32, 0);
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn too_many_attributes_fail_fast() {
        let mut layout = Layout::new();
        for _ in 0 ..= MAX_ATTRIBUTES {
            layout.push(ElementType::F32, 1);
        }
    }
}
