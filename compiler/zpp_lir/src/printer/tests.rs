use crate::{
    BinOp, Callee, CmpPred, Const, Function, FunctionBuilder, Global, GlobalInit, Linkage, Module,
    Operand,
};
use pretty_assertions::assert_eq;
use zpp_ir::StringInterner;
use zpp_types::{TypeId, TypePool};

#[test]
fn prints_a_small_module() {
    let interner = StringInterner::new();
    let pool = TypePool::new(&interner);
    let mut module = Module::new("main.zpp");

    let text = module.add_global(Global {
        name: "main::str.0".into(),
        ty: TypeId::U8,
        init: GlobalInit::Bytes(b"hi\n\0".to_vec()),
        linkage: Linkage::Private,
        constant: true,
    });
    let puts = module.add_function(Function::declaration(
        "puts".into(),
        vec![TypeId::CSTRING],
        TypeId::I32,
    ));

    let mut b = FunctionBuilder::new(&[TypeId::U32]);
    let entry = b.new_block("entry");
    let then_block = b.new_block("if.then");
    let exit = b.new_block("if.exit");
    b.position_at(entry);
    let param = Operand::Value(b.param(0).unwrap_or_else(|| unreachable!()));
    let zero = Operand::Const(Const::Int {
        ty: TypeId::U32,
        value: 0,
    });
    let cond = b.emit_cmp(CmpPred::Eq, param.clone(), zero);
    b.terminate_branch(Operand::Value(cond), then_block, exit);
    b.position_at(then_block);
    b.emit_call(
        TypeId::I32,
        true,
        Callee::Direct(puts),
        vec![Operand::Const(Const::Global(text))],
    );
    b.terminate_jump(exit);
    b.position_at(exit);
    let doubled = b.emit_binary(BinOp::Mul, TypeId::U32, param.clone(), param);
    b.terminate_return(Some(Operand::Value(doubled)));
    let func = b.finish("main::f".into(), Linkage::Private, vec![TypeId::U32], TypeId::U32);
    module.add_function(func);

    assert_eq!(
        module.display(&pool).to_string(),
        "; ModuleID = 'main.zpp'\n\
         @\"main::str.0\" = private unnamed_addr constant [4 x i8] c\"hi\\0A\\00\"\n\
         \n\
         declare i32 @puts(ptr)\n\
         \n\
         define private i32 @\"main::f\"(i32 %0) {\n\
         entry:\n\
         \x20 %1 = icmp eq i32 %0, 0\n\
         \x20 br i1 %1, label %if.then, label %if.exit\n\
         if.then:\n\
         \x20 %2 = call i32 @puts(ptr @\"main::str.0\")\n\
         \x20 br label %if.exit\n\
         if.exit:\n\
         \x20 %3 = mul i32 %0, %0\n\
         \x20 ret i32 %3\n\
         }\n"
    );
}

#[test]
fn prints_aggregate_and_float_constants() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let arr = pool.array(2, TypeId::F64);
    let mut module = Module::new("m");
    module.add_global(Global {
        name: "m::xs".into(),
        ty: arr,
        init: GlobalInit::Const(Const::Array {
            ty: arr,
            elems: vec![
                Const::Float {
                    ty: TypeId::F64,
                    value: 1.0,
                },
                Const::Float {
                    ty: TypeId::F64,
                    value: 0.5,
                },
            ],
        }),
        linkage: Linkage::Private,
        constant: false,
    });
    module.add_global(Global {
        name: "errno".into(),
        ty: TypeId::I32,
        init: GlobalInit::External,
        linkage: Linkage::External,
        constant: false,
    });

    assert_eq!(
        module.display(&pool).to_string(),
        "; ModuleID = 'm'\n\
         @\"m::xs\" = private global [2 x double] [double 0x3FF0000000000000, double 0x3FE0000000000000]\n\
         @errno = external global i32\n"
    );
}
