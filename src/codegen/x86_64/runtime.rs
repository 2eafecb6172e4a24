//! The fixed runtime routines every emitted program links against inline
//! (§4.5, §5). Each routine is emitted exactly once per program, so its
//! internal labels are plain fixed strings rather than freshly generated
//! ones.
//!
//! The instruction model in [`crate::asm`] only carries `je`/`jne` branches
//! and `setCC`-into-a-byte-register comparisons; a handful of range checks
//! below (`jl`, `jg`, `jge`) and the one's-complement negation fall back to
//! [`crate::asm::Instruction::Raw`], exactly the "handful of spots" its doc
//! comment reserves that variant for.

use crate::asm::{InstructionOperand as Op, InstructionSize::*, *};

use super::literals::LiteralPool;

fn raw(text: impl Into<String>) -> Instruction {
    Instruction::Raw(format!("\t{}", text.into()))
}

fn label(name: &str) -> Instruction {
    Instruction::Label(name.to_string())
}

fn comment(text: &str) -> Instruction {
    Instruction::Comment(text.to_string())
}

/// The three shared static buffers every runtime routine reads or writes
/// (§5). Declared once in `.data`; the aliasing contract is documented here
/// as assembler comments, matching where a reader would look for it.
pub fn data_buffers() -> Vec<Instruction> {
    vec![
        comment("input_buffer: single-writer arena for read_string; holds at most 255 bytes + NUL"),
        Instruction::Space("input_buffer".to_string(), 256),
        comment("temp_buffer: single-writer scratch for num_to_string/char_to_string"),
        Instruction::Space("temp_buffer".to_string(), 64),
        comment("string_buffer: single shared output arena for concat/interpolate/append (§5);"),
        comment("a pointer returned from one of those calls is invalidated by the next such call"),
        Instruction::Space("string_buffer".to_string(), 4096),
    ]
}

/// Interns the two string constants `bool_to_string` always needs, so the
/// labels exist no matter which routines a given program actually uses.
pub fn intern_bool_literals(pool: &mut LiteralPool) -> (String, String) {
    (pool.intern("true"), pool.intern("false"))
}

/// Emits every runtime routine listed in §4.5, in the order a reader would
/// naturally want them: string primitives first, then the conversions that
/// build on them.
pub fn emit(true_label: &str, false_label: &str) -> Vec<Instruction> {
    let mut out = vec![];
    out.extend(print_string());
    out.extend(strlen());
    out.extend(read_string());
    out.extend(remove_newline());
    out.extend(memcpy_simple());
    out.extend(string_to_num());
    out.extend(string_to_char());
    out.extend(string_to_bool());
    out.extend(num_to_string());
    out.extend(char_to_string());
    out.extend(bool_to_string(true_label, false_label));
    out.extend(string_concat());
    out.extend(string_append());
    out.extend(value_to_string_formatted());
    out.extend(string_interpolate());
    out.extend(print_value_auto());
    out
}

fn print_string() -> Vec<Instruction> {
    vec![
        comment("print_string: rdi = NUL-terminated string. Writes it to fd 1."),
        label("print_string"),
        Instruction::Push(Reg::Rdi),
        Instruction::Call("strlen".to_string()),
        Instruction::Pop(Reg::Rdi),
        Instruction::Mov(Qword, Op::Register(Reg::Rdx), Op::Register(Reg::Rax)),
        Instruction::Mov(Qword, Op::Register(Reg::Rsi), Op::Register(Reg::Rdi)),
        Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Immediate(1)),
        Instruction::Mov(Qword, Op::Register(Reg::Rax), Op::Immediate(WRITE_SYSCALL)),
        Instruction::Syscall,
        Instruction::Ret,
    ]
}

fn strlen() -> Vec<Instruction> {
    vec![
        comment("strlen: rdi = pointer, preserved. Returns length in rax."),
        label("strlen"),
        Instruction::Mov(Qword, Op::Register(Reg::Rcx), Op::Register(Reg::Rdi)),
        Instruction::Xor(Op::Register(Reg::Rax), Op::Register(Reg::Rax)),
        label(".Lstrlen_loop"),
        Instruction::Cmp(Byte, Op::Indirect(Reg::Rcx), Op::Immediate(0)),
        Instruction::Je(".Lstrlen_done".to_string()),
        Instruction::Inc(Op::Register(Reg::Rcx)),
        Instruction::Inc(Op::Register(Reg::Rax)),
        Instruction::Jmp(".Lstrlen_loop".to_string()),
        label(".Lstrlen_done"),
        Instruction::Ret,
    ]
}

fn read_string() -> Vec<Instruction> {
    vec![
        comment("read_string: sys_read(0, input_buffer, 255), then strips the trailing newline."),
        label("read_string"),
        Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Immediate(0)),
        Instruction::Leaq(Op::Register(Reg::Rsi), Op::RipRelative("input_buffer".to_string())),
        Instruction::Mov(Qword, Op::Register(Reg::Rdx), Op::Immediate(255)),
        Instruction::Mov(Qword, Op::Register(Reg::Rax), Op::Immediate(READ_SYSCALL)),
        Instruction::Syscall,
        Instruction::Leaq(Op::Register(Reg::Rdi), Op::RipRelative("input_buffer".to_string())),
        Instruction::Call("remove_newline".to_string()),
        Instruction::Leaq(Op::Register(Reg::Rax), Op::RipRelative("input_buffer".to_string())),
        Instruction::Ret,
    ]
}

fn remove_newline() -> Vec<Instruction> {
    vec![
        comment("remove_newline: rdi = pointer. Replaces the first '\\n' (or the NUL) with '\\0'."),
        label("remove_newline"),
        Instruction::Mov(Qword, Op::Register(Reg::Rcx), Op::Register(Reg::Rdi)),
        label(".Lrmnl_loop"),
        Instruction::Cmp(Byte, Op::Indirect(Reg::Rcx), Op::Immediate(10)),
        Instruction::Je(".Lrmnl_found".to_string()),
        Instruction::Cmp(Byte, Op::Indirect(Reg::Rcx), Op::Immediate(0)),
        Instruction::Je(".Lrmnl_done".to_string()),
        Instruction::Inc(Op::Register(Reg::Rcx)),
        Instruction::Jmp(".Lrmnl_loop".to_string()),
        label(".Lrmnl_found"),
        Instruction::Mov(Byte, Op::Indirect(Reg::Rcx), Op::Immediate(0)),
        label(".Lrmnl_done"),
        Instruction::Ret,
    ]
}

fn memcpy_simple() -> Vec<Instruction> {
    vec![
        comment("memcpy_simple: rdi = dst, rsi = src, rcx = count. Clobbers rdi, rsi, rcx, rax."),
        label("memcpy_simple"),
        label(".Lmemcpy_loop"),
        Instruction::Cmp(Qword, Op::Register(Reg::Rcx), Op::Immediate(0)),
        Instruction::Je(".Lmemcpy_done".to_string()),
        Instruction::Movzbq(Op::Register(Reg::Rax), Op::Indirect(Reg::Rsi)),
        Instruction::Mov(Byte, Op::Indirect(Reg::Rdi), Op::RegisterByte(Reg::Rax)),
        Instruction::Inc(Op::Register(Reg::Rdi)),
        Instruction::Inc(Op::Register(Reg::Rsi)),
        Instruction::Sub(Qword, Op::Register(Reg::Rcx), Op::Immediate(1)),
        Instruction::Jmp(".Lmemcpy_loop".to_string()),
        label(".Lmemcpy_done"),
        Instruction::Ret,
    ]
}

fn string_to_num() -> Vec<Instruction> {
    vec![
        comment("string_to_num: rdi = text. Skips leading space/tab, an optional sign, then"),
        comment("digits; stops at the first non-digit. Empty/invalid input yields 0 (§8)."),
        label("string_to_num"),
        Instruction::Mov(Qword, Op::Register(Reg::Rcx), Op::Register(Reg::Rdi)),
        Instruction::Mov(Qword, Op::Register(Reg::R8), Op::Immediate(1)),
        label(".Lstn_ws"),
        Instruction::Movzbq(Op::Register(Reg::Rax), Op::Indirect(Reg::Rcx)),
        Instruction::Cmp(Qword, Op::Register(Reg::Rax), Op::Immediate(32)),
        Instruction::Je(".Lstn_ws_adv".to_string()),
        Instruction::Cmp(Qword, Op::Register(Reg::Rax), Op::Immediate(9)),
        Instruction::Je(".Lstn_ws_adv".to_string()),
        Instruction::Jmp(".Lstn_sign".to_string()),
        label(".Lstn_ws_adv"),
        Instruction::Inc(Op::Register(Reg::Rcx)),
        Instruction::Jmp(".Lstn_ws".to_string()),
        label(".Lstn_sign"),
        Instruction::Movzbq(Op::Register(Reg::Rax), Op::Indirect(Reg::Rcx)),
        Instruction::Cmp(Qword, Op::Register(Reg::Rax), Op::Immediate(45)),
        Instruction::Jne(".Lstn_plus".to_string()),
        Instruction::Mov(Qword, Op::Register(Reg::R8), Op::Immediate(-1)),
        Instruction::Inc(Op::Register(Reg::Rcx)),
        Instruction::Jmp(".Lstn_digits".to_string()),
        label(".Lstn_plus"),
        Instruction::Cmp(Qword, Op::Register(Reg::Rax), Op::Immediate(43)),
        Instruction::Jne(".Lstn_digits".to_string()),
        Instruction::Inc(Op::Register(Reg::Rcx)),
        label(".Lstn_digits"),
        Instruction::Xor(Op::Register(Reg::R9), Op::Register(Reg::R9)),
        label(".Lstn_loop"),
        Instruction::Movzbq(Op::Register(Reg::Rax), Op::Indirect(Reg::Rcx)),
        Instruction::Cmp(Qword, Op::Register(Reg::Rax), Op::Immediate(48)),
        raw("jl\t.Lstn_done"),
        Instruction::Cmp(Qword, Op::Register(Reg::Rax), Op::Immediate(57)),
        raw("jg\t.Lstn_done"),
        Instruction::Imul(Op::Register(Reg::R9), Op::Immediate(10)),
        Instruction::Sub(Qword, Op::Register(Reg::Rax), Op::Immediate(48)),
        Instruction::Add(Qword, Op::Register(Reg::R9), Op::Register(Reg::Rax)),
        Instruction::Inc(Op::Register(Reg::Rcx)),
        Instruction::Jmp(".Lstn_loop".to_string()),
        label(".Lstn_done"),
        Instruction::Mov(Qword, Op::Register(Reg::Rax), Op::Register(Reg::R9)),
        Instruction::Imul(Op::Register(Reg::Rax), Op::Register(Reg::R8)),
        Instruction::Ret,
    ]
}

fn string_to_char() -> Vec<Instruction> {
    vec![
        comment("string_to_char: rdi = text. Returns its first byte, 0 if empty."),
        label("string_to_char"),
        Instruction::Movzbq(Op::Register(Reg::Rax), Op::Indirect(Reg::Rdi)),
        Instruction::Ret,
    ]
}

fn string_to_bool() -> Vec<Instruction> {
    vec![
        comment("string_to_bool: rdi = text. 1 iff exactly \"true\", 0 iff exactly \"false\","),
        comment("0 for anything else, including case variants (§8)."),
        label("string_to_bool"),
        Instruction::Mov(Qword, Op::Register(Reg::Rcx), Op::Register(Reg::Rdi)),
        Instruction::Cmp(Byte, Op::Indirect(Reg::Rcx), Op::Immediate('t' as i64)),
        Instruction::Jne(".Lstb_try_false".to_string()),
        Instruction::Inc(Op::Register(Reg::Rcx)),
        Instruction::Cmp(Byte, Op::Indirect(Reg::Rcx), Op::Immediate('r' as i64)),
        Instruction::Jne(".Lstb_zero".to_string()),
        Instruction::Inc(Op::Register(Reg::Rcx)),
        Instruction::Cmp(Byte, Op::Indirect(Reg::Rcx), Op::Immediate('u' as i64)),
        Instruction::Jne(".Lstb_zero".to_string()),
        Instruction::Inc(Op::Register(Reg::Rcx)),
        Instruction::Cmp(Byte, Op::Indirect(Reg::Rcx), Op::Immediate('e' as i64)),
        Instruction::Jne(".Lstb_zero".to_string()),
        Instruction::Inc(Op::Register(Reg::Rcx)),
        Instruction::Cmp(Byte, Op::Indirect(Reg::Rcx), Op::Immediate(0)),
        Instruction::Jne(".Lstb_zero".to_string()),
        Instruction::Mov(Qword, Op::Register(Reg::Rax), Op::Immediate(1)),
        Instruction::Ret,
        label(".Lstb_try_false"),
        Instruction::Cmp(Byte, Op::Indirect(Reg::Rcx), Op::Immediate('f' as i64)),
        Instruction::Jne(".Lstb_zero".to_string()),
        Instruction::Inc(Op::Register(Reg::Rcx)),
        Instruction::Cmp(Byte, Op::Indirect(Reg::Rcx), Op::Immediate('a' as i64)),
        Instruction::Jne(".Lstb_zero".to_string()),
        Instruction::Inc(Op::Register(Reg::Rcx)),
        Instruction::Cmp(Byte, Op::Indirect(Reg::Rcx), Op::Immediate('l' as i64)),
        Instruction::Jne(".Lstb_zero".to_string()),
        Instruction::Inc(Op::Register(Reg::Rcx)),
        Instruction::Cmp(Byte, Op::Indirect(Reg::Rcx), Op::Immediate('s' as i64)),
        Instruction::Jne(".Lstb_zero".to_string()),
        Instruction::Inc(Op::Register(Reg::Rcx)),
        Instruction::Cmp(Byte, Op::Indirect(Reg::Rcx), Op::Immediate('e' as i64)),
        Instruction::Jne(".Lstb_zero".to_string()),
        Instruction::Inc(Op::Register(Reg::Rcx)),
        Instruction::Cmp(Byte, Op::Indirect(Reg::Rcx), Op::Immediate(0)),
        Instruction::Jne(".Lstb_zero".to_string()),
        Instruction::Mov(Qword, Op::Register(Reg::Rax), Op::Immediate(0)),
        Instruction::Ret,
        label(".Lstb_zero"),
        Instruction::Xor(Op::Register(Reg::Rax), Op::Register(Reg::Rax)),
        Instruction::Ret,
    ]
}

fn num_to_string() -> Vec<Instruction> {
    vec![
        comment("num_to_string: rdi = signed value. Writes decimal digits right-to-left into"),
        comment("temp_buffer, prepending '-' when negative. Returns the start address."),
        label("num_to_string"),
        Instruction::Leaq(Op::Register(Reg::Rcx), Op::RipRelative("temp_buffer".to_string())),
        Instruction::Add(Qword, Op::Register(Reg::Rcx), Op::Immediate(63)),
        Instruction::Mov(Byte, Op::Indirect(Reg::Rcx), Op::Immediate(0)),
        Instruction::Mov(Qword, Op::Register(Reg::Rax), Op::Register(Reg::Rdi)),
        Instruction::Mov(Qword, Op::Register(Reg::R8), Op::Immediate(0)),
        Instruction::Cmp(Qword, Op::Register(Reg::Rax), Op::Immediate(0)),
        raw("jge\t.Lnts_sign_done"),
        Instruction::Mov(Qword, Op::Register(Reg::R8), Op::Immediate(1)),
        raw("negq\t%rax"),
        label(".Lnts_sign_done"),
        Instruction::Mov(Qword, Op::Register(Reg::R9), Op::Immediate(10)),
        Instruction::Cmp(Qword, Op::Register(Reg::Rax), Op::Immediate(0)),
        Instruction::Jne(".Lnts_digit_loop".to_string()),
        Instruction::Sub(Qword, Op::Register(Reg::Rcx), Op::Immediate(1)),
        Instruction::Mov(Byte, Op::Indirect(Reg::Rcx), Op::Immediate('0' as i64)),
        Instruction::Jmp(".Lnts_after_digits".to_string()),
        label(".Lnts_digit_loop"),
        Instruction::Cmp(Qword, Op::Register(Reg::Rax), Op::Immediate(0)),
        Instruction::Je(".Lnts_after_digits".to_string()),
        Instruction::Cqto,
        Instruction::Idiv(Op::Register(Reg::R9)),
        Instruction::Add(Qword, Op::Register(Reg::Rdx), Op::Immediate('0' as i64)),
        Instruction::Sub(Qword, Op::Register(Reg::Rcx), Op::Immediate(1)),
        Instruction::Mov(Byte, Op::Indirect(Reg::Rcx), Op::RegisterByte(Reg::Rdx)),
        Instruction::Jmp(".Lnts_digit_loop".to_string()),
        label(".Lnts_after_digits"),
        Instruction::Cmp(Qword, Op::Register(Reg::R8), Op::Immediate(1)),
        Instruction::Jne(".Lnts_done".to_string()),
        Instruction::Sub(Qword, Op::Register(Reg::Rcx), Op::Immediate(1)),
        Instruction::Mov(Byte, Op::Indirect(Reg::Rcx), Op::Immediate('-' as i64)),
        label(".Lnts_done"),
        Instruction::Mov(Qword, Op::Register(Reg::Rax), Op::Register(Reg::Rcx)),
        Instruction::Ret,
    ]
}

fn char_to_string() -> Vec<Instruction> {
    vec![
        comment("char_to_string: rdi = byte value. Writes it plus a NUL into temp_buffer."),
        label("char_to_string"),
        Instruction::Mov(Qword, Op::Register(Reg::Rax), Op::Register(Reg::Rdi)),
        Instruction::Leaq(Op::Register(Reg::Rcx), Op::RipRelative("temp_buffer".to_string())),
        Instruction::Mov(Byte, Op::Indirect(Reg::Rcx), Op::RegisterByte(Reg::Rax)),
        Instruction::Inc(Op::Register(Reg::Rcx)),
        Instruction::Mov(Byte, Op::Indirect(Reg::Rcx), Op::Immediate(0)),
        Instruction::Leaq(Op::Register(Reg::Rax), Op::RipRelative("temp_buffer".to_string())),
        Instruction::Ret,
    ]
}

fn bool_to_string(true_label: &str, false_label: &str) -> Vec<Instruction> {
    vec![
        comment("bool_to_string: rdi = 0 or 1. Returns the address of the interned literal."),
        label("bool_to_string"),
        Instruction::Cmp(Qword, Op::Register(Reg::Rdi), Op::Immediate(0)),
        Instruction::Je(".Lbts_false".to_string()),
        Instruction::Leaq(Op::Register(Reg::Rax), Op::RipRelative(true_label.to_string())),
        Instruction::Ret,
        label(".Lbts_false"),
        Instruction::Leaq(Op::Register(Reg::Rax), Op::RipRelative(false_label.to_string())),
        Instruction::Ret,
    ]
}

fn string_concat() -> Vec<Instruction> {
    vec![
        comment("string_concat: rdi = a, rsi = b. Writes a then b into string_buffer (§5: not"),
        comment("reentrant, shares the buffer with string_interpolate/string_append)."),
        label("string_concat"),
        Instruction::Push(Reg::Rsi),
        Instruction::Call("strlen".to_string()),
        Instruction::Mov(Qword, Op::Register(Reg::R8), Op::Register(Reg::Rax)),
        Instruction::Pop(Reg::Rdi),
        Instruction::Push(Reg::Rdi),
        Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Register(Reg::Rsi)),
        Instruction::Call("strlen".to_string()),
        Instruction::Mov(Qword, Op::Register(Reg::R9), Op::Register(Reg::Rax)),
        Instruction::Pop(Reg::Rsi),
        Instruction::Pop(Reg::Rdi),
        Instruction::Leaq(Op::Register(Reg::R10), Op::RipRelative("string_buffer".to_string())),
        Instruction::Push(Reg::Rsi),
        Instruction::Mov(Qword, Op::Register(Reg::Rsi), Op::Register(Reg::Rdi)),
        Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Register(Reg::R10)),
        Instruction::Mov(Qword, Op::Register(Reg::Rcx), Op::Register(Reg::R8)),
        Instruction::Call("memcpy_simple".to_string()),
        Instruction::Add(Qword, Op::Register(Reg::R10), Op::Register(Reg::R8)),
        Instruction::Pop(Reg::Rsi),
        Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Register(Reg::R10)),
        Instruction::Mov(Qword, Op::Register(Reg::Rcx), Op::Register(Reg::R9)),
        Instruction::Call("memcpy_simple".to_string()),
        Instruction::Add(Qword, Op::Register(Reg::R10), Op::Register(Reg::R9)),
        Instruction::Mov(Byte, Op::Indirect(Reg::R10), Op::Immediate(0)),
        Instruction::Leaq(Op::Register(Reg::Rax), Op::RipRelative("string_buffer".to_string())),
        Instruction::Ret,
    ]
}

fn string_append() -> Vec<Instruction> {
    vec![
        comment("string_append: rdi = text. Appends it after string_buffer's current contents,"),
        comment("maintaining the NUL terminator."),
        label("string_append"),
        Instruction::Mov(Qword, Op::Register(Reg::R8), Op::Register(Reg::Rdi)),
        Instruction::Leaq(Op::Register(Reg::Rdi), Op::RipRelative("string_buffer".to_string())),
        Instruction::Call("strlen".to_string()),
        Instruction::Mov(Qword, Op::Register(Reg::R9), Op::Register(Reg::Rax)),
        Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Register(Reg::R8)),
        Instruction::Call("strlen".to_string()),
        Instruction::Mov(Qword, Op::Register(Reg::R10), Op::Register(Reg::Rax)),
        Instruction::Leaq(Op::Register(Reg::Rdi), Op::RipRelative("string_buffer".to_string())),
        Instruction::Add(Qword, Op::Register(Reg::Rdi), Op::Register(Reg::R9)),
        Instruction::Mov(Qword, Op::Register(Reg::Rsi), Op::Register(Reg::R8)),
        Instruction::Mov(Qword, Op::Register(Reg::Rcx), Op::Register(Reg::R10)),
        Instruction::Call("memcpy_simple".to_string()),
        Instruction::Leaq(Op::Register(Reg::Rax), Op::RipRelative("string_buffer".to_string())),
        Instruction::Add(Qword, Op::Register(Reg::Rax), Op::Register(Reg::R9)),
        Instruction::Add(Qword, Op::Register(Reg::Rax), Op::Register(Reg::R10)),
        Instruction::Mov(Byte, Op::Indirect(Reg::Rax), Op::Immediate(0)),
        Instruction::Leaq(Op::Register(Reg::Rax), Op::RipRelative("string_buffer".to_string())),
        Instruction::Ret,
    ]
}

fn value_to_string_formatted() -> Vec<Instruction> {
    vec![
        comment("value_to_string_formatted: rdi = value, rsi = format tag (FormatSpec discriminant)."),
        comment("\":s\" (tag 3) returns the value unchanged as a text pointer; everything else,"),
        comment("including the default, goes through num_to_string (\":f\" aliases \":d\", §9)."),
        label("value_to_string_formatted"),
        Instruction::Cmp(Qword, Op::Register(Reg::Rsi), Op::Immediate(3)),
        Instruction::Je(".Lvtsf_str".to_string()),
        Instruction::Call("num_to_string".to_string()),
        Instruction::Ret,
        label(".Lvtsf_str"),
        Instruction::Mov(Qword, Op::Register(Reg::Rax), Op::Register(Reg::Rdi)),
        Instruction::Ret,
    ]
}

fn string_interpolate() -> Vec<Instruction> {
    vec![
        comment("string_interpolate: rdi = descriptor [expr_count, parts_count, parts[..],"),
        comment("(value, format)[..]], all 8-byte cells. Builds the result into string_buffer"),
        comment("by alternating string_append(part) with value_to_string_formatted+string_append."),
        label("string_interpolate"),
        Instruction::Mov(Qword, Op::Register(Reg::Rcx), Op::Register(Reg::Rdi)),
        Instruction::Mov(Qword, Op::Register(Reg::R8), Op::Indirect(Reg::Rcx)),
        Instruction::Add(Qword, Op::Register(Reg::Rcx), Op::Immediate(8)),
        Instruction::Mov(Qword, Op::Register(Reg::R9), Op::Indirect(Reg::Rcx)),
        Instruction::Add(Qword, Op::Register(Reg::Rcx), Op::Immediate(8)),
        Instruction::Mov(Qword, Op::Register(Reg::Rbx), Op::Register(Reg::Rcx)),
        Instruction::Mov(Qword, Op::Register(Reg::Rdx), Op::Register(Reg::Rbx)),
        Instruction::Mov(Qword, Op::Register(Reg::Rax), Op::Register(Reg::R9)),
        Instruction::Imul(Op::Register(Reg::Rax), Op::Immediate(8)),
        Instruction::Add(Qword, Op::Register(Reg::Rdx), Op::Register(Reg::Rax)),
        Instruction::Leaq(Op::Register(Reg::Rax), Op::RipRelative("string_buffer".to_string())),
        Instruction::Mov(Byte, Op::Indirect(Reg::Rax), Op::Immediate(0)),
        Instruction::Xor(Op::Register(Reg::R10), Op::Register(Reg::R10)),
        label(".Lsi_loop"),
        Instruction::Cmp(Qword, Op::Register(Reg::R10), Op::Register(Reg::R9)),
        Instruction::Je(".Lsi_done".to_string()),
        Instruction::Push(Reg::Rbx),
        Instruction::Push(Reg::Rdx),
        Instruction::Push(Reg::R8),
        Instruction::Push(Reg::R9),
        Instruction::Push(Reg::R10),
        Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Indirect(Reg::Rbx)),
        Instruction::Call("string_append".to_string()),
        Instruction::Pop(Reg::R10),
        Instruction::Pop(Reg::R9),
        Instruction::Pop(Reg::R8),
        Instruction::Pop(Reg::Rdx),
        Instruction::Pop(Reg::Rbx),
        Instruction::Add(Qword, Op::Register(Reg::Rbx), Op::Immediate(8)),
        Instruction::Cmp(Qword, Op::Register(Reg::R10), Op::Register(Reg::R8)),
        Instruction::Je(".Lsi_advance".to_string()),
        Instruction::Push(Reg::Rbx),
        Instruction::Push(Reg::Rdx),
        Instruction::Push(Reg::R8),
        Instruction::Push(Reg::R9),
        Instruction::Push(Reg::R10),
        Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Indirect(Reg::Rdx)),
        Instruction::Add(Qword, Op::Register(Reg::Rdx), Op::Immediate(8)),
        Instruction::Mov(Qword, Op::Register(Reg::Rsi), Op::Indirect(Reg::Rdx)),
        Instruction::Add(Qword, Op::Register(Reg::Rdx), Op::Immediate(8)),
        Instruction::Call("value_to_string_formatted".to_string()),
        Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Register(Reg::Rax)),
        Instruction::Call("string_append".to_string()),
        Instruction::Pop(Reg::R10),
        Instruction::Pop(Reg::R9),
        Instruction::Pop(Reg::R8),
        Instruction::Pop(Reg::Rdx),
        Instruction::Pop(Reg::Rbx),
        label(".Lsi_advance"),
        Instruction::Inc(Op::Register(Reg::R10)),
        Instruction::Jmp(".Lsi_loop".to_string()),
        label(".Lsi_done"),
        Instruction::Leaq(Op::Register(Reg::Rax), Op::RipRelative("string_buffer".to_string())),
        Instruction::Ret,
    ]
}

fn print_value_auto() -> Vec<Instruction> {
    vec![
        comment("print_value_auto: heuristic fallback for a runtime value of unresolved type"),
        comment("(§9: defence-in-depth, should not trigger for programs this compiler itself"),
        comment("type-checked). Numeric if outside [0x1000, 0x100000); otherwise peeks one byte"),
        comment("and treats it as text iff that byte is printable ASCII."),
        label("print_value_auto"),
        Instruction::Cmp(Qword, Op::Register(Reg::Rdi), Op::Immediate(0x1000)),
        raw("jl\t.Lpva_numeric"),
        Instruction::Cmp(Qword, Op::Register(Reg::Rdi), Op::Immediate(0x100000)),
        raw("jge\t.Lpva_numeric"),
        Instruction::Movzbq(Op::Register(Reg::Rax), Op::Indirect(Reg::Rdi)),
        Instruction::Cmp(Qword, Op::Register(Reg::Rax), Op::Immediate(0x20)),
        raw("jl\t.Lpva_numeric"),
        Instruction::Cmp(Qword, Op::Register(Reg::Rax), Op::Immediate(0x7E)),
        raw("jg\t.Lpva_numeric"),
        Instruction::Call("print_string".to_string()),
        Instruction::Ret,
        label(".Lpva_numeric"),
        Instruction::Call("num_to_string".to_string()),
        Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Register(Reg::Rax)),
        Instruction::Call("print_string".to_string()),
        Instruction::Ret,
    ]
}
