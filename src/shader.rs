//! Shader module creation with compile errors surfaced as [`SampleError`]s.
//!
//! wgpu reports invalid WGSL through the device's error sink rather than a
//! return value. Wrapping creation in a validation error scope turns that
//! report back into an ordinary `Result` the caller can propagate with `?`.

use crate::error::{SampleError, SampleResult};

/// Compiles `source` into a shader module, failing with the compiler's message.
pub fn create_shader_module(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> SampleResult<wgpu::ShaderModule> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    match pollster::block_on(scope.pop()) {
        Some(error) => {
            let message = error.to_string();
            log::error!("could not compile shader `{label}`:\n{message}");
            Err(SampleError::Shader {
                label: label.to_string(),
                message,
            })
        }
        None => Ok(module),
    }
}

/// Runs `create` inside a validation error scope and reports failures for `label`.
pub fn validated<T>(
    device: &wgpu::Device,
    label: &str,
    create: impl FnOnce() -> T,
) -> SampleResult<T> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(scope.pop()) {
        Some(error) => {
            let message = error.to_string();
            log::error!("could not create `{label}`: {message}");
            Err(SampleError::Pipeline {
                label: label.to_string(),
                message,
            })
        }
        None => Ok(value),
    }
}

/// Logs every GPU error that no error scope captured.
pub fn log_uncaptured_errors(device: &wgpu::Device) {
    device.on_uncaptured_error(std::sync::Arc::new(|error: wgpu::Error| {
        log::error!("GPU error: {error}");
    }));
}

/// Replaces every `${name}` placeholder with its value.
///
/// Placeholders without a value are left in place so the shader compiler
/// points at them.
pub fn format_shader_code<'a, I>(source: &str, values: I) -> String
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    values
        .into_iter()
        .fold(source.to_string(), |code, (name, value)| {
            code.replace(&format!("${{{name}}}"), &value)
        })
}

#[cfg(test)]
mod tests {
    use super::format_shader_code;

    #[test]
    fn replaces_every_occurrence() {
        let code = "@workgroup_size(${wg}) fn a() {} @workgroup_size(${wg}) fn b() {}";
        let formatted = format_shader_code(code, [("wg", "64".to_string())]);
        assert_eq!(formatted, "@workgroup_size(64) fn a() {} @workgroup_size(64) fn b() {}");
    }

    #[test]
    fn leaves_unknown_placeholders() {
        let formatted = format_shader_code("let w = ${width};", [("height", "1".to_string())]);
        assert_eq!(formatted, "let w = ${width};");
    }
}
