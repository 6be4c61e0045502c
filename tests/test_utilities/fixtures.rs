use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::Path;
use tar::{Builder, EntryType, Header};

pub const MIT_TEXT: &str = "MIT License

Copyright (c) 2024 Example Authors

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the \"Software\"), to deal
in the Software without restriction.
";

pub const APACHE_TEXT: &str = "
                                 Apache License
                           Version 2.0, January 2004
                        http://www.apache.org/licenses/
";

pub const OS_RELEASE: &str = "PRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"
NAME=\"Debian GNU/Linux\"
ID=debian
";

pub const DPKG_STATUS: &str = "Package: libc6
Status: install ok installed
Maintainer: GNU Libc Maintainers <debian-glibc@lists.debian.org>
Version: 2.36-9+deb12u4

Package: base-files
Status: install ok installed
Maintainer: Santiago Vila <sanvila@debian.org>
Version: 12.4+deb12u5
";

/// Builds an uncompressed tar holding regular files
pub fn tar_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = Builder::new(Vec::new());
    for (path, content) in files {
        let mut header = Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, path, *content).unwrap();
    }
    builder.into_inner().unwrap()
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Writes a docker-archive with one gzip-compressed tar per layer
pub fn write_image_archive(path: &Path, tag: &str, layers: &[Vec<(&str, &str)>]) {
    let layer_blobs: Vec<(String, Vec<u8>)> = layers
        .iter()
        .enumerate()
        .map(|(idx, files)| {
            let files: Vec<(&str, &[u8])> =
                files.iter().map(|(p, c)| (*p, c.as_bytes())).collect();
            (format!("layer{}/layer.tar", idx), gzip(&tar_bytes(&files)))
        })
        .collect();

    let manifest = serde_json::json!([{
        "Config": "config.json",
        "RepoTags": [tag],
        "Layers": layer_blobs.iter().map(|(name, _)| name.clone()).collect::<Vec<_>>(),
    }])
    .to_string();

    let mut entries: Vec<(&str, &[u8])> = vec![
        ("manifest.json", manifest.as_bytes()),
        ("config.json", b"{}"),
    ];
    for (name, blob) in &layer_blobs {
        entries.push((name.as_str(), blob.as_slice()));
    }
    std::fs::write(path, tar_bytes(&entries)).unwrap();
}

/// Writes a docker-archive listing the same layer twice, the second time as a
/// symlink the way `docker save` stores repeated layers
pub fn write_image_archive_with_repeated_layer(path: &Path, tag: &str, files: &[(&str, &str)]) {
    let files: Vec<(&str, &[u8])> = files.iter().map(|(p, c)| (*p, c.as_bytes())).collect();
    let layer = gzip(&tar_bytes(&files));
    let manifest = serde_json::json!([{
        "Config": "config.json",
        "RepoTags": [tag],
        "Layers": ["base/layer.tar", "again/layer.tar"],
    }])
    .to_string();

    let mut builder = Builder::new(Vec::new());
    for (name, content) in [
        ("manifest.json", manifest.as_bytes()),
        ("config.json", b"{}".as_slice()),
        ("base/layer.tar", layer.as_slice()),
    ] {
        let mut header = Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, content).unwrap();
    }

    let mut link = Header::new_gnu();
    link.set_entry_type(EntryType::Symlink);
    link.set_size(0);
    link.set_mode(0o777);
    builder
        .append_link(&mut link, "again/layer.tar", "../base/layer.tar")
        .unwrap();

    std::fs::write(path, builder.into_inner().unwrap()).unwrap();
}
