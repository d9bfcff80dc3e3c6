#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::*;
use crate::{Compiler, Registry};

/// Compile and drop the metadata comments.
fn compile(src: &str) -> Result<String, CompileError> {
    let registry = Registry::default();
    let out = Compiler::new(&registry).compile(src)?;
    Ok(strip_meta(&out))
}

fn strip_meta(s: &str) -> String {
    let mut out = String::new();
    let mut rest = s;
    while let Some(start) = rest.find(" /* {") {
        out.push_str(&rest[..start]);
        let end = rest[start..].find("} */").unwrap() + start + 4;
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

const LOOP1: &str = "$L1=$V[\"items\"];if (is_array($L1) and !empty($L1)) {$L1s=count($L1);$L1i=-1;foreach($L1 as $L1k=>$L1v) { ++$L1i;";

#[test]
fn echo() {
    assert_eq!(compile("[= 1 + 2 ]").unwrap(), "<?= 1 + 2 ?>");
}

#[test]
fn loop_scaffolding() {
    assert_eq!(
        compile("[@ items ]x[/]").unwrap(),
        format!("<?php {LOOP1} ?>x<?php }}}} ?>")
    );
}

#[test]
fn loop_else_closes_both_braces() {
    assert_eq!(
        compile("[@ items ]x[:]none[/]").unwrap(),
        format!("<?php {LOOP1} ?>x<?php }}}} else {{ ?>none<?php }} ?>")
    );
}

#[test]
fn branch_else_if_else() {
    assert_eq!(
        compile("[? a ]A[: b ]B[:]C[/]").unwrap(),
        "<?php if ($V[\"a\"]) { ?>A<?php } else if ($V[\"b\"]) { ?>B<?php } else { ?>C<?php } ?>"
    );
}

#[test]
fn nested_loops_number_their_frames() {
    let out = compile("[@ items ][@ .v ][= ..v ][/][/]").unwrap();
    assert!(out.contains("$L2=$L1v;"), "{out}");
    assert!(out.contains("<?= $L2v ?>"), "{out}");
    assert!(out.ends_with("<?php }} ?><?php }} ?>"), "{out}");

    let err = compile("[@ items ][@ .v ][= ...v ][/][/]").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2004);
}

#[test]
fn loop_expression_cannot_see_its_own_frame() {
    let err = compile("[@ .v ][/]").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2004);
}

#[test]
fn deep_mixed_nesting() {
    let src = "[@ a ][? .v ][@ .v.list ][? ..i ][= ..v ][: ]-[/][:][/][: ]x[/][:]empty[/]";
    let out = compile(src).unwrap();
    assert_eq!(out.matches("foreach").count(), 2);
    assert!(out.contains("<?= $L2v ?>"), "{out}");
    assert!(out.contains("$L2=$L1v[\"list\"];"), "{out}");
    // Braces balance: each loop opens two, each branch one.
    let opens = out.matches('{').count();
    let closes = out.matches('}').count();
    assert_eq!(opens, closes, "{out}");
}

#[test]
fn three_levels_of_loops_in_branches() {
    let src = "\
[? x ]
  [@ a ]
    [? .i ]
      [@ .v ]
        [@ ..v ]
          [= ...v ][= .k ][= ..i ]
        [:]
          none
        [/]
      [/]
    [/]
  [/]
[/]";
    let out = compile(src).unwrap();
    assert!(out.contains("<?= $L3v ?>"));
    assert!(out.contains("<?= $L1k ?>"));
    assert!(out.contains("<?= $L2i ?>"));
    assert_eq!(out.matches('{').count(), out.matches('}').count(), "{out}");
}

#[test]
fn double_else_is_rejected() {
    let err = compile("[? a ]x[:]y[:]z[/]").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E3001);
    let err = compile("[@ a ]x[:]y[:]z[/]").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E3001);
    let err = compile("[@ a ]x[:]y[: b ]z[/]").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E3001);
}

#[test]
fn else_on_loop_takes_no_expression() {
    let err = compile("[@ a ]x[: b ]y[/]").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E0002);
}

#[test]
fn unclosed_blocks_name_their_command_and_line() {
    let err = compile("a\n[@ items ]\nx").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E3002);
    assert_eq!(err.message(), "[@...] is not closed by [/]");
    assert_eq!(err.line(), Some(2));

    let err = compile("[@ items ][/]\n\n[? a ]x[:]y").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E3002);
    assert_eq!(err.message(), "[?...] is not closed by [/]");
    assert_eq!(err.line(), Some(3));
}

#[test]
fn close_and_else_outside_blocks_are_literal() {
    assert_eq!(compile("a [/] b [:] c").unwrap(), "a [/] b [:] c");
    assert_eq!(compile("[? a ]x[/][/]").unwrap(), "<?php if ($V[\"a\"]) { ?>x<?php } ?>[/]");
}

#[test]
fn right_tag_required() {
    let err = compile("[= a b").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E1002);
    // Outside a block the closer is plain text, so nothing is checked.
    assert_eq!(compile("[/ x]").unwrap(), "[/ x]");
    let err = compile("[? a ][/ x]").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E0002);
    let err = compile("[? a ]x[/").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E0003);
}

#[test]
fn html_comment_wrapped_tags() {
    assert_eq!(
        compile("<ul><!-- [@ items ] --><li><!--[/]--></ul>").unwrap(),
        format!("<ul><?php {LOOP1} ?><li><?php }}}} ?></ul>")
    );
}

#[test]
fn metadata_records_line_and_raw_tag() {
    let registry = Registry::default();
    let out = Compiler::new(&registry)
        .compile("x\n<!-- [= a ] -->")
        .unwrap();
    assert_eq!(
        out,
        "x\n<?= $V[\"a\"] /* {\"line\":2,\"code\":\"<!-- [= a ] -->\"} */ ?>"
    );
}

#[test]
fn metadata_escapes_comment_close() {
    let meta = TagMeta {
        line: 4,
        code: "[= \"*/\" ]".to_owned(),
    };
    let comment = meta.to_comment();
    assert_eq!(comment, "/* {\"line\":4,\"code\":\"[= \\\"*\\/\\\" ]\"} */");
    assert_eq!(TagMeta::find(&format!("<?= 1 {comment} ?>")), Some(meta));
}

#[test]
fn find_skips_non_metadata_comments() {
    let text = "/* {not json} */ <?= 1 /* {\"line\":9,\"code\":\"[= 1 ]\"} */ ?>";
    assert_eq!(
        TagMeta::find(text),
        Some(TagMeta {
            line: 9,
            code: "[= 1 ]".to_owned()
        })
    );
    assert_eq!(TagMeta::find("<p>plain</p>"), None);
}
