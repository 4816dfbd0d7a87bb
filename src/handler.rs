//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 与 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::constants::{
    BITS_PER_BYTE, DEFAULT_IMAGE_EXTENSION, HIDDEN_IMAGE_PREFIX, LENGTH_PREFIX_BITS,
    RECOVERED_TEXT_PREFIX,
};
use crate::frame::{extract_framed, framed_bits, hide_framed};
use crate::pixel::PixelGrid;
use crate::steganography::{capacity_bits, extract, hide};
use anyhow::{Context, Result};
use colored::Colorize;
use image::RgbaImage;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本文件、检查隐写空间是否足够、调用隐写核心函数散布文本的每个比特，
/// 最后以无损格式写入目标图像文件。未使用 `--framed` 时会打印恢复所需的比特数。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与选项的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件，或文本不是 UTF-8。
/// * 文本为空，或图像没有足够的空间来隐藏文本。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args.dest.clone().unwrap_or_else(|| {
        default_path(&args.image, HIDDEN_IMAGE_PREFIX, DEFAULT_IMAGE_EXTENSION)
    });
    ensure_writable(&dest, args.force)?;

    let mut picture = load_image(&args.image)?;

    let text = fs::read_to_string(&args.text).with_context(|| {
        format!(
            "Unable to read text file (it must be UTF-8): {}",
            args.text.to_string_lossy().red().bold()
        )
    })?;
    anyhow::ensure!(
        !text.is_empty(),
        "The text file is empty: {}",
        args.text.to_string_lossy().red().bold()
    );

    let required_space = if args.framed {
        framed_bits(text.len())
    } else {
        (text.len() * BITS_PER_BYTE) as u64
    };
    let available_space = capacity_bits(&picture);

    anyhow::ensure!(
        available_space >= required_space,
        "Not enough space in the image to hide the text. \nRequired: {} bits, Available: {} bits",
        required_space.to_string().red().bold(),
        available_space.to_string().green().bold()
    );

    info!(
        "hiding {} bytes in {} ({}x{})",
        text.len(),
        args.image.display(),
        picture.width(),
        picture.height()
    );

    let hidden = if args.framed {
        hide_framed(&mut picture, &text)
    } else {
        hide(&mut picture, &text)
    };
    hidden.with_context(|| {
        format!(
            "Failed to hide the text in {}.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    verify_hidden(&picture, &text, args.framed)?;

    picture.save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;
    info!("wrote {}", dest.display());

    println!(
        "The text has been successfully hidden, verified and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    if !args.framed {
        println!(
            "Recover it with: --bits {}",
            required_space.to_string().green().bold()
        );
    }

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件，按 `--bits` 指定的长度或帧头中的长度恢复文本，
/// 最后将恢复的文本内容写入目标文本文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与长度选项的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * `--bits` 与 `--framed` 同时出现或都未出现。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像文件。
/// * 核心恢复函数在执行过程中失败 (长度非法、超出容量、结果不是 UTF-8)。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    anyhow::ensure!(
        args.bits.is_some() != args.framed,
        "Specify exactly one of --bits <N> or --framed"
    );

    let dest = args
        .text
        .clone()
        .unwrap_or_else(|| default_path(&args.image, RECOVERED_TEXT_PREFIX, "txt"));
    ensure_writable(&dest, args.force)?;

    let picture = load_image(&args.image)?;

    let text = match args.bits {
        Some(bits) => extract(&picture, bits),
        None => extract_framed(&picture),
    }
    .with_context(|| {
        format!(
            "Failed to recover the text from '{}'. \nThe image may not contain a hidden message or the length is wrong.",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    info!("recovered {} bytes from {}", text.len(), args.image.display());

    fs::write(&dest, text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑，打印图像尺寸与可承载的数据量。
///
/// # Errors
///
/// 无法读取或解码图像文件时返回错误。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let picture = load_image(&args.image)?;
    let bits = capacity_bits(&picture);
    let framed_bytes = bits.saturating_sub(LENGTH_PREFIX_BITS as u64) / BITS_PER_BYTE as u64;

    println!(
        "{}: {}x{} ({} pixels)",
        args.image.to_string_lossy().bold(),
        picture.width(),
        picture.height(),
        picture.total_pixels()
    );
    println!(
        "Capacity: {} bits, {} bytes ({} bytes with --framed)",
        bits.to_string().green().bold(),
        (bits / BITS_PER_BYTE as u64).to_string().green().bold(),
        framed_bytes.to_string().green().bold()
    );
    Ok(())
}

/// 从刚写入的图像中重新读出文本，确认与原文一致。
///
/// 未使用帧格式时按 `8 * 字节数` 个比特读取，否则从长度头读取。
///
/// # Errors
///
/// 读取失败或读出的文本与原文不一致时返回错误。
pub fn verify_hidden<G: PixelGrid + ?Sized>(picture: &G, text: &str, framed: bool) -> Result<()> {
    let recovered = if framed {
        extract_framed(picture)
    } else {
        extract(picture, (text.len() * BITS_PER_BYTE) as u64)
    }
    .context("Verification failed: the hidden text could not be read back.")?;

    anyhow::ensure!(
        recovered == text,
        "Verification failed: the text read back differs from the original. \nExpected {} bytes, got {} bytes",
        text.len().to_string().green().bold(),
        recovered.len().to_string().red().bold()
    );
    info!("verified {} bytes after hiding", text.len());
    Ok(())
}

fn load_image(path: &Path) -> Result<RgbaImage> {
    let picture = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    Ok(picture.to_rgba8())
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 在源文件旁生成 `<前缀><文件名主干>.<扩展名>` 形式的默认输出路径。
fn default_path(source: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    source.with_file_name(format!("{prefix}{stem}.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::pixel::ArgbImage;

    #[test]
    fn verification_accepts_a_fresh_hide() {
        let mut grid = ArgbImage::filled(8, 8, 0xFF_55_66_77);
        hide(&mut grid, "read me back").unwrap();
        verify_hidden(&grid, "read me back", false).unwrap();

        let mut framed = ArgbImage::filled(8, 8, 0xFF_55_66_77);
        hide_framed(&mut framed, "read me back").unwrap();
        verify_hidden(&framed, "read me back", true).unwrap();
    }

    #[test]
    fn verification_rejects_a_mismatch() {
        let mut grid = ArgbImage::filled(8, 8, 0xFF_55_66_77);
        hide(&mut grid, "original").unwrap();

        let err = verify_hidden(&grid, "tampered", false).unwrap_err();
        assert!(err.to_string().contains("Verification failed"));

        // 帧头读不出合法长度时同样失败
        let blank = ArgbImage::filled(8, 8, 0);
        let err = verify_hidden(&blank, "original", true).unwrap_err();
        assert!(err.to_string().contains("Verification failed"));
    }

    #[test]
    fn default_paths_sit_next_to_the_source() {
        let source = Path::new("some/dir/original.bmp");
        assert_eq!(
            default_path(source, HIDDEN_IMAGE_PREFIX, DEFAULT_IMAGE_EXTENSION),
            PathBuf::from("some/dir/doctored_original.png")
        );
        assert_eq!(
            default_path(Path::new("doctored_original.png"), RECOVERED_TEXT_PREFIX, "txt"),
            PathBuf::from("recovered_doctored_original.txt")
        );
    }
}
