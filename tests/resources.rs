use gl_primer::buffer::{self, Attribute, Format};
use gl_primer::draw_call::{DrawCall, Primitive};
use gl_primer::driver::Driver as _;
use gl_primer::gl;
use gl_primer::handle::Kind;
use gl_primer::headless::{self, Value};
use gl_primer::sampler::{Filter, Sampler, Wrap};
use gl_primer::{Error, Factory, Image, Stage};
use std::{env, fs, process};

const VS: &str = "\
#version 330 core
layout (location = 0) in vec3 aPos;
uniform mat4 transform;
void main() {
    gl_Position = transform * vec4(aPos, 1.0);
}
";

const FS: &str = "\
#version 330 core
uniform vec4 color;
uniform float alpha;
out vec4 fragColor;
void main() {
    fragColor = vec4(color.rgb, alpha);
}
";

fn factory() -> Factory<headless::Driver> {
    Factory::new(headless::Driver::new())
}

#[test]
fn failed_compile_leaks_no_shader() {
    let factory = factory();
    match factory.shader(Stage::Fragment, "broken.fs", "#version 330 core\nvoid main() {\n") {
        Err(Error::ShaderCompile { name, log }) => {
            assert_eq!(name, "broken.fs");
            assert!(!log.is_empty());
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(factory.collect_garbage(), 1);
    assert_eq!(factory.driver().live(Kind::Shader), 0);
    let deleted = factory.driver().deleted();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].0, Kind::Shader);
}

#[test]
fn missing_semicolon_fails_to_compile() {
    let factory = factory();
    let source = "#version 330 core\nout vec4 fragColor;\nvoid main() { fragColor = vec4(1.0) bogus }\n";
    match factory.shader(Stage::Fragment, "bogus.fs", source) {
        Err(Error::ShaderCompile { name, log }) => {
            assert_eq!(name, "bogus.fs");
            assert!(log.contains("error"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    factory.collect_garbage();
    assert_eq!(factory.driver().live_objects(), 0);
}

#[test]
fn failed_link_leaks_no_program() {
    let factory = factory();
    let vs = factory.shader(Stage::Vertex, "vs", VS).unwrap();
    match factory.program(&[vs]) {
        Err(Error::ProgramLink { log }) => assert!(log.contains("fragment")),
        other => panic!("unexpected result: {:?}", other),
    }
    factory.collect_garbage();
    assert_eq!(factory.driver().live(Kind::Program), 0);
    assert_eq!(factory.driver().live(Kind::Shader), 0);
}

#[test]
fn bad_fragment_file_is_named_in_the_error() {
    let dir = env::temp_dir().join(format!("gl-primer-{}", process::id()));
    fs::create_dir_all(&dir).unwrap();
    let vs_path = dir.join("good.vs");
    let fs_path = dir.join("bad.fs");
    fs::write(&vs_path, VS).unwrap();
    fs::write(&fs_path, "void main() { }\n").unwrap();

    let factory = factory();
    let result = factory.program_from_files(&vs_path, &fs_path);
    fs::remove_dir_all(&dir).unwrap();
    match result {
        Err(Error::ShaderCompile { name, .. }) => assert!(name.ends_with("bad.fs")),
        other => panic!("unexpected result: {:?}", other),
    }
    factory.collect_garbage();
    assert_eq!(factory.driver().live_objects(), 0);
}

#[test]
fn missing_shader_file_is_a_file_error() {
    let factory = factory();
    match factory.program_from_files("no/such.vs", "no/such.fs") {
        Err(Error::File { path, .. }) => assert!(path.ends_with("such.vs")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn unknown_uniforms_are_ignored() {
    let mut factory = factory();
    let program = {
        let vs = factory.shader(Stage::Vertex, "vs", VS).unwrap();
        let fs = factory.shader(Stage::Fragment, "fs", FS).unwrap();
        factory.program(&[vs, fs]).unwrap()
    };
    {
        let pass = factory.use_program(&program);
        assert_eq!(pass.uniform_location("nothing"), -1);
        pass.set_uniform("alpha", 0.5f32);
        pass.set_uniform("nothing", 2.0f32);
    }
    assert_eq!(factory.driver().get_error(), gl::NO_ERROR);
    assert_eq!(factory.driver().uniform(program.id(), "alpha"), Some(Value::Float(0.5)));
    assert_eq!(factory.driver().uniform_count(program.id()), 1);
}

#[test]
fn buffer_size_matches_the_upload() {
    let factory = factory();
    let data = [1.0f32, 2.0, 3.0, 4.0, 5.0];
    let buffer = factory
        .buffer_with_data(buffer::Kind::Array, buffer::Usage::StaticDraw, &data)
        .unwrap();
    assert_eq!(buffer.size(), 20);
    assert_eq!(factory.buffer_size(&buffer), 20);
    let contents = factory.driver().buffer_contents(buffer.id()).unwrap();
    assert_eq!(&contents[.. 4], &1.0f32.to_ne_bytes());
}

#[test]
fn indexed_draw_without_indices_is_skipped() {
    let mut factory = factory();
    let program = {
        let vs = factory.shader(Stage::Vertex, "vs", VS).unwrap();
        let fs = factory.shader(Stage::Fragment, "fs", FS).unwrap();
        factory.program(&[vs, fs]).unwrap()
    };
    let vertices = factory
        .buffer_with_data(buffer::Kind::Array, buffer::Usage::StaticDraw, &[0.0f32; 9])
        .unwrap();
    let mut layout = factory.vertex_layout().unwrap();
    factory
        .set_attrib(&mut layout, &vertices, 0, Attribute::new(Format::F32(3), 0, 12))
        .unwrap();
    {
        let pass = factory.use_program(&program);
        pass.draw(&layout, DrawCall::elements(Primitive::Triangles, 0, 3));
        pass.draw(&layout, DrawCall::arrays(Primitive::Triangles, 0, 3));
    }
    let draws = factory.driver().draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].index_type, None);
    assert_eq!(factory.driver().get_error(), gl::NO_ERROR);
}

#[test]
fn solid_texture_samples_its_color() {
    let factory = factory();
    let image = Image::from_pixels(2, 2, 4, [255, 0, 0, 255].repeat(4)).unwrap();
    let texture = factory.texture_from_image(&image).unwrap();
    assert_eq!(texture.width(), 2);
    assert_eq!(factory.driver().texture_size(texture.id()), Some((2, 2)));
    assert!(texture.mipmap());
    assert!(factory.driver().has_mipmaps(texture.id()));
    assert_eq!(factory.driver().sample(texture.id(), 0.25, 0.75), Some([255, 0, 0, 255]));
    assert_eq!(factory.read_texture(&texture), [255, 0, 0, 255].repeat(4));
}

#[test]
fn single_channel_textures_expand_on_read() {
    let factory = factory();
    let image = Image::from_pixels(1, 1, 1, vec![200]).unwrap();
    let texture = factory.texture_from_image(&image).unwrap();
    assert_eq!(texture.channels(), 1);
    assert_eq!(factory.driver().texture_format(texture.id()), Some(gl::R8));
    assert_eq!(factory.read_texture(&texture), vec![200, 0, 0, 255]);
}

#[test]
fn two_channel_images_are_rejected() {
    let factory = factory();
    let image = Image::from_pixels(1, 1, 2, vec![1, 2]).unwrap();
    match factory.texture_from_image(&image) {
        Err(Error::UnsupportedChannels(2)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn samplers_are_applied_to_the_texture() {
    let factory = factory();
    let mut texture = factory.texture_from_image(&Image::checker(4, 4, 2)).unwrap();
    assert_eq!(
        factory.driver().texture_param(texture.id(), gl::TEXTURE_MIN_FILTER),
        Some(gl::LINEAR_MIPMAP_LINEAR),
    );
    let sampler = Sampler::filter(Filter::Nearest, Filter::Nearest).with_wrap(Wrap::Repeat, Wrap::Repeat);
    factory.set_sampler(&mut texture, sampler);
    assert_eq!(texture.sampler(), sampler);
    assert_eq!(
        factory.driver().texture_param(texture.id(), gl::TEXTURE_WRAP_S),
        Some(gl::REPEAT),
    );
    assert_eq!(
        factory.driver().sample(texture.id(), 1.0, 0.0),
        factory.driver().sample(texture.id(), 0.0, 0.0),
    );
}

#[test]
fn container_image_loads_as_rgb() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/image/container.png");
    let image = Image::load(path).unwrap();
    assert_eq!((image.width(), image.height(), image.channels()), (64, 64, 3));
    assert_eq!(image.data().len(), 64 * 64 * 3);
}

#[test]
fn loaded_images_start_at_the_bottom_row() {
    let dir = env::temp_dir().join(format!("gl-primer-flip-{}", process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("stripes.png");
    ::image::RgbImage::from_raw(1, 2, vec![255, 0, 0, 0, 0, 255])
        .unwrap()
        .save(&path)
        .unwrap();

    let image = Image::load(&path);
    fs::remove_dir_all(&dir).unwrap();
    let image = image.unwrap();
    assert_eq!((image.width(), image.height(), image.channels()), (1, 2, 3));
    assert_eq!(&image.data()[0..3], &[0, 0, 255]);
    assert_eq!(&image.data()[3..6], &[255, 0, 0]);
}
