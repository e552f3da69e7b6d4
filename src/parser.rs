use std::path::{Path, PathBuf};
use swc_common::{FileName, SourceMap, Spanned, comments::SingleThreadedComments, sync::Lrc};
use swc_ecma_ast::{Module, ModuleItem};
use swc_ecma_codegen::{Config as CodegenConfig, Emitter, text_writer::JsWriter};
use swc_ecma_parser::{Parser as SwcParser, StringInput, Syntax, TsConfig, lexer::Lexer};
use tracing::debug;

use crate::error::{Error, Result};

/// パース済みのモジュールと、コード生成に必要な SourceMap / コメント
pub struct ParsedModule {
    pub file: PathBuf,
    pub module: Module,
    cm: Lrc<SourceMap>,
    comments: SingleThreadedComments,
}

/// TypeScript モジュールとしてソースをパースする
///
/// 回復可能なエラーも含め、構文エラーは 1 つでもあれば失敗にする。
pub fn parse_module(src: &str, file_path: &Path) -> Result<ParsedModule> {
    let cm: Lrc<SourceMap> = Default::default();
    let comments = SingleThreadedComments::default();

    let fm = cm.new_source_file(FileName::Real(file_path.to_path_buf()), src.to_string());

    // TypeScript構文でパースする設定
    let syntax = Syntax::Typescript(TsConfig {
        tsx: false,
        decorators: true,
        dts: false,
        no_early_errors: false,
        disallow_ambiguous_jsx_like: true,
    });

    let parse_error = |e: swc_ecma_parser::error::Error| Error::Parse {
        file: file_path.to_path_buf(),
        line: cm.lookup_char_pos(e.span().lo).line,
        message: e.kind().msg().to_string(),
    };

    let module = {
        let lexer = Lexer::new(
            syntax,
            Default::default(), // es version
            StringInput::from(&*fm),
            Some(&comments),
        );
        let mut parser = SwcParser::new_from(lexer);

        let module = parser.parse_module().map_err(parse_error)?;
        if let Some(e) = parser.take_errors().into_iter().next() {
            return Err(parse_error(e));
        }
        module
    };

    debug!(file = %file_path.display(), items = module.body.len(), "パース成功");

    Ok(ParsedModule {
        file: file_path.to_path_buf(),
        module,
        cm,
        comments,
    })
}

impl ParsedModule {
    /// AST をソースコードに戻す (コメントも保持する)
    pub fn emit(&self) -> Result<String> {
        let mut buf = Vec::new();
        {
            let mut emitter = Emitter {
                cfg: CodegenConfig::default(),
                cm: self.cm.clone(),
                comments: Some(&self.comments),
                wr: JsWriter::new(self.cm.clone(), "\n", &mut buf, None),
            };
            emitter.emit_module(&self.module).map_err(|source| Error::Emit {
                file: self.file.clone(),
                source,
            })?;
        }

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// 同じ SourceMap 上で追加のコード片をパースし、トップレベルの文を返す
    ///
    /// 注入する文の Span を元ファイルの位置と重ねないために、別ファイルとして登録する。
    pub fn parse_snippet(&self, name: &str, src: &str) -> Result<Vec<ModuleItem>> {
        let fm = self
            .cm
            .new_source_file(FileName::Custom(name.to_string()), src.to_string());

        let lexer = Lexer::new(
            Syntax::Typescript(Default::default()),
            Default::default(),
            StringInput::from(&*fm),
            None,
        );
        let mut parser = SwcParser::new_from(lexer);

        let module = parser.parse_module().map_err(|e| Error::Parse {
            file: PathBuf::from(name),
            line: self.cm.lookup_char_pos(e.span().lo).line,
            message: e.kind().msg().to_string(),
        })?;
        Ok(module.body)
    }
}
