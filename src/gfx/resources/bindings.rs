//! Bind group plumbing shared by the uniform groups
//!
//! Every group the gallery shader reads is a short list of uniform,
//! texture and sampler slots visible to one set of stages. [`GroupLayout`]
//! numbers the slots in order and [`GroupLayout::bind`] pairs resources
//! with them in the same order.

use std::marker::PhantomData;

/// Kind of resource bound at one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Uniform,
    /// Filterable 2D float texture
    Texture,
    /// Filtering sampler
    Sampler,
}

impl Slot {
    pub fn binding_type(self) -> wgpu::BindingType {
        match self {
            Slot::Uniform => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            Slot::Texture => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            Slot::Sampler => wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        }
    }
}

fn layout_entries(visibility: wgpu::ShaderStages, slots: &[Slot]) -> Vec<wgpu::BindGroupLayoutEntry> {
    slots
        .iter()
        .enumerate()
        .map(|(index, slot)| wgpu::BindGroupLayoutEntry {
            binding: index as u32,
            visibility,
            ty: slot.binding_type(),
            count: None,
        })
        .collect()
}

/// Bind group layout that remembers its slot list
pub struct GroupLayout {
    layout: wgpu::BindGroupLayout,
    slots: Vec<Slot>,
    label: &'static str,
}

impl GroupLayout {
    pub fn new(
        device: &wgpu::Device,
        label: &'static str,
        visibility: wgpu::ShaderStages,
        slots: &[Slot],
    ) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &layout_entries(visibility, slots),
        });
        Self {
            layout,
            slots: slots.to_vec(),
            label,
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Creates a bind group; `resources` follow the slot order
    pub fn bind(&self, device: &wgpu::Device, resources: Vec<wgpu::BindingResource>) -> wgpu::BindGroup {
        debug_assert_eq!(
            resources.len(),
            self.slots.len(),
            "{} expects {} resources",
            self.label,
            self.slots.len()
        );
        let entries: Vec<wgpu::BindGroupEntry> = resources
            .into_iter()
            .enumerate()
            .map(|(index, resource)| wgpu::BindGroupEntry {
                binding: index as u32,
                resource,
            })
            .collect();
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(self.label),
            layout: &self.layout,
            entries: &entries,
        })
    }
}

/// One uniform value in its own GPU buffer
///
/// Writes are skipped while the value is unchanged, which keeps idle
/// frames free of uploads for static artworks.
pub struct Uniform<T> {
    buffer: wgpu::Buffer,
    uploaded: Option<Vec<u8>>,
    _value: PhantomData<T>,
}

impl<T: bytemuck::Pod> Uniform<T> {
    pub fn new(device: &wgpu::Device, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<T>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            uploaded: None,
            _value: PhantomData,
        }
    }

    /// Uploads `value`; returns false when it matched the last upload
    pub fn write(&mut self, queue: &wgpu::Queue, value: &T) -> bool {
        let bytes = bytemuck::bytes_of(value);
        if self.uploaded.as_deref() == Some(bytes) {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, bytes);
        self.uploaded = Some(bytes.to_vec());
        true
    }

    pub fn resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_numbered_in_order() {
        let entries = layout_entries(
            wgpu::ShaderStages::FRAGMENT,
            &[Slot::Uniform, Slot::Texture, Slot::Sampler],
        );
        let bindings: Vec<u32> = entries.iter().map(|e| e.binding).collect();
        assert_eq!(bindings, vec![0, 1, 2]);
        assert!(entries
            .iter()
            .all(|e| e.visibility == wgpu::ShaderStages::FRAGMENT));
    }

    #[test]
    fn texture_slot_is_filterable_2d() {
        match Slot::Texture.binding_type() {
            wgpu::BindingType::Texture {
                sample_type,
                view_dimension,
                multisampled,
            } => {
                assert_eq!(sample_type, wgpu::TextureSampleType::Float { filterable: true });
                assert_eq!(view_dimension, wgpu::TextureViewDimension::D2);
                assert!(!multisampled);
            }
            other => panic!("unexpected binding type {:?}", other),
        }
    }
}
