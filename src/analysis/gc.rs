//! Эвристика выбора сборщика мусора по JVM флагам
//!
//! Из строки флагов извлекаются только размер кучи и алгоритм GC.
//! Классификатор всегда возвращает ровно одну карточку и никогда не падает.

use regex::Regex;
use std::sync::LazyLock;

use crate::i18n::Language;
use crate::types::{Finding, JvmFlagSignal};

/// `-Xms`/`-Xmx` с размером, за которым (не обязательно сразу) идёт `-XX:+Use<Name>GC`
static GC_FLAGS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)-Xm[sx]([0-9]+[kmg])\b.*?(-XX:\+Use(\w+)GC)\b").expect("Invalid regex")
});

const ZGC_MIN_MB: f64 = 20480.0;
const G1_TUNING_MIN_MB: f64 = 12088.0;
const ZGC_MIN_JAVA: u32 = 16;
const G1_TUNED_FLAG: &str = "-XX:G1NewSizePercent=30";

/// Размер памяти в мегабайтах: "2g" -> 2048, "1024k" -> 1, "512m" -> 512
pub fn parse_memory_size(text: &str) -> Option<f64> {
    let digits_end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let size: f64 = text[..digits_end].parse().ok()?;

    match text[digits_end..].chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('g') => Some(size * 1024.0),
        Some('k') => Some(size / 1024.0),
        _ => Some(size),
    }
}

/// Извлечь размер кучи и алгоритм GC (первое совпадение)
pub fn extract_memory_and_gc(flags: &str) -> Option<JvmFlagSignal> {
    let caps = GC_FLAGS_RE.captures(flags)?;
    let memory_mb = parse_memory_size(caps.get(1)?.as_str())?;
    let gc_algorithm = caps.get(3)?.as_str().to_string();
    Some(JvmFlagSignal {
        memory_mb,
        gc_algorithm,
    })
}

fn format_mb(mb: f64) -> String {
    if mb.fract() == 0.0 && mb.abs() < 1e15 {
        format!("{}", mb as i64)
    } else {
        format!("{}", mb)
    }
}

/// Классифицировать JVM флаги, результат всегда одна карточка
pub fn classify(flags: &str, is_server: bool, java_major: u32, lang: Language) -> Finding {
    let zh = lang == Language::Chinese;

    let Some(signal) = extract_memory_and_gc(flags) else {
        log::debug!("JVM flags did not match heap+GC pattern");
        return if zh {
            Finding::new("⚠️ 标签", "我们无法对你的启动标签进行扫描。")
        } else {
            Finding::new("⚠️ Flags", "We were unable to scan your startup flags.")
        };
    };

    let memory = signal.memory_mb;
    let gc = signal.gc_algorithm.as_str();
    log::debug!("GC signal: {}GC with {}MB", gc, format_mb(memory));

    if gc == "Z" && memory <= ZGC_MIN_MB {
        let mb = format_mb(memory);
        return Finding::new(
            "❗ ZGC",
            if zh {
                format!("ZGC 应仅在分配 20GB+ 内存时使用，但你只分配 {}MB。", mb)
            } else {
                format!(
                    "ZGC should only be used with 20GB+ of memory, but you only allocated {}MB.",
                    mb
                )
            },
        );
    }

    if gc == "Shenandoah" && is_server {
        return Finding::new(
            "❗ Shenandoah",
            if zh {
                "ShenandoahGC 在服务端上表现欠佳，推荐仅在客户端使用"
            } else {
                "ShenandoahGC performs poorly on servers, use it on clients only"
            },
        );
    }

    if gc == "G1" {
        if memory >= ZGC_MIN_MB && java_major >= ZGC_MIN_JAVA {
            return Finding::new(
                "❗ G1 to ZGC",
                if zh {
                    format!(
                        "你在 Java{} 上分配了 20GB+ 的内存，因此 ZGC 是个不错的选择，请考虑更换。",
                        java_major
                    )
                } else {
                    format!(
                        "You allocated 20GB+ of memory on Java{}, ZGC is a good choice there. Consider switching.",
                        java_major
                    )
                },
            );
        }
        if memory >= G1_TUNING_MIN_MB && flags.contains(G1_TUNED_FLAG) {
            return if zh {
                Finding::new(
                    "❗ G1 改进",
                    "当你分配 12GB+ 内存并使用 G1GC，你可以更改一些值来增进性能。",
                )
            } else {
                Finding::new(
                    "❗ G1 Tuning",
                    "With 12GB+ of memory on G1GC you can change a few values to improve performance.",
                )
            };
        }
    }

    Finding::new(
        format!("✅ {}GC", gc),
        if zh {
            "好样的，你的启动标签在自动扫描中没有任何问题。"
        } else {
            "Well done, the automatic scan found no problems with your startup flags."
        },
    )
}
